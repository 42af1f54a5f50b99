use std::fmt;

use thiserror::Error;

/// Machine-readable status carried by every failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcCode {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl RpcCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcCode::Canceled => "canceled",
            RpcCode::Unknown => "unknown",
            RpcCode::InvalidArgument => "invalid_argument",
            RpcCode::DeadlineExceeded => "deadline_exceeded",
            RpcCode::NotFound => "not_found",
            RpcCode::AlreadyExists => "already_exists",
            RpcCode::PermissionDenied => "permission_denied",
            RpcCode::ResourceExhausted => "resource_exhausted",
            RpcCode::FailedPrecondition => "failed_precondition",
            RpcCode::Aborted => "aborted",
            RpcCode::OutOfRange => "out_of_range",
            RpcCode::Unimplemented => "unimplemented",
            RpcCode::Internal => "internal",
            RpcCode::Unavailable => "unavailable",
            RpcCode::DataLoss => "data_loss",
            RpcCode::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for RpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call to the club backend. `message` is human readable and is shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RpcError {
    pub code: RpcCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Unauthenticated, message)
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.code == RpcCode::Unauthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = RpcError::new(RpcCode::PermissionDenied, "no rights to join roles");
        assert_eq!(err.to_string(), "no rights to join roles");
        assert_eq!(err.code.to_string(), "permission_denied");
    }

    #[test]
    fn only_unauthenticated_code_is_unauthenticated() {
        assert!(RpcError::unauthenticated("authentication required").is_unauthenticated());
        assert!(!RpcError::new(RpcCode::Internal, "authentication required").is_unauthenticated());
    }
}
