use thiserror::Error;

use crate::api::RpcError;

const MEMBERSHIP_REQUIRED_PATTERN: &str = "you must be a member";

/// Matches the backend's wording for users outside the club chat, case-insensitively.
pub fn is_membership_required(message: &str) -> bool {
    message.to_lowercase().contains(MEMBERSHIP_REQUIRED_PATTERN)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Rpc(#[from] RpcError),

    #[error("server returned no authorization tokens")]
    TokenExchangeIncomplete,

    #[error("{0}")]
    MembershipRequired(String),

    #[error("open the app through the club's Telegram mini app")]
    NoHostContext,

    #[error("{0}")]
    LoginLink(RpcError),
}

impl SessionError {
    /// Classifies a failed identity exchange.
    pub fn from_exchange(err: RpcError) -> Self {
        if is_membership_required(&err.message) {
            SessionError::MembershipRequired(err.message)
        } else {
            SessionError::Rpc(err)
        }
    }
}
