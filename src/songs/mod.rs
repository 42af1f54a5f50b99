//! Song catalogue: paginated list, client-side filter and the detail view.

pub mod filter;
pub mod list;
pub mod state;
pub mod visibility;


pub use filter::{FilterState, apply_client_filter};
pub use list::SongList;
pub use state::{DetailState, ListPage, SongListState};
pub use visibility::{HostSignal, VisibilityTracker};
