//! Authentication state machine and the pieces it writes to.

pub mod controller;
pub mod error;
pub mod host;
pub mod state;
pub mod tokens;


pub use controller::SessionController;
pub use error::SessionError;
pub use host::{HostBridge, HostContext, InitData, LaunchHost};
pub use state::{AuthGate, AuthPhase, Session};
pub use tokens::{MemoryTokenStore, TokenPair, TokenStore};
