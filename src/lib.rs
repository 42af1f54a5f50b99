//! Client-side state core for the music club mini app: the authentication state
//! machine and the paginated song catalogue with its detail view.

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod session;
pub mod songs;
pub mod util;

pub use app::{Capabilities, Club, Intent};
pub use config::ClientConfig;
pub use event::Event;
