//! RPC status and error definitions.

use thiserror::Error;

use crate::resilience::retries::Retryable;

// Re-export RpcClientConfig from config module to avoid duplication
pub use crate::config::schema::RpcClientConfig;

/// Failure status reported by an RPC transport.
///
/// Unavailable, DeadlineExceeded and ResourceExhausted are transient
/// and retried; every other status is fatal and propagates immediately
/// without consuming a retry.
#[derive(Debug, Clone, Error)]
pub enum RpcStatus {
    /// The service is unreachable or refusing work.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The per-attempt deadline elapsed before a response arrived.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// The service is shedding load (quota, concurrency limits).
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The request was malformed for the called method.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service failed internally.
    #[error("internal: {0}")]
    Internal(String),

    /// Any status this taxonomy does not model.
    #[error("unknown: {0}")]
    Unknown(String),
}

impl Retryable for RpcStatus {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcStatus::Unavailable(_)
                | RpcStatus::DeadlineExceeded(_)
                | RpcStatus::ResourceExhausted(_)
        )
    }

    fn error_class(&self) -> &'static str {
        match self {
            RpcStatus::Unavailable(_) => "unavailable",
            RpcStatus::DeadlineExceeded(_) => "deadline_exceeded",
            RpcStatus::ResourceExhausted(_) => "resource_exhausted",
            RpcStatus::InvalidArgument(_) => "invalid_argument",
            RpcStatus::NotFound(_) => "not_found",
            RpcStatus::Internal(_) => "internal",
            RpcStatus::Unknown(_) => "unknown",
        }
    }
}

/// Errors surfaced by the resilient RPC client, annotated with the
/// method that was being called.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A non-retryable status; surfaced on first occurrence.
    #[error("rpc call {method} failed: {status}")]
    Fatal {
        method: String,
        #[source]
        status: RpcStatus,
    },

    /// All retries consumed; carries the last observed status.
    #[error("rpc call {method} failed after {attempts} attempts: {status}")]
    RetriesExhausted {
        method: String,
        attempts: u32,
        #[source]
        status: RpcStatus,
    },
}

impl RpcError {
    /// The underlying transport status.
    pub fn status(&self) -> &RpcStatus {
        match self {
            RpcError::Fatal { status, .. } | RpcError::RetriesExhausted { status, .. } => status,
        }
    }

    /// The RPC method the failure belongs to.
    pub fn method(&self) -> &str {
        match self {
            RpcError::Fatal { method, .. } | RpcError::RetriesExhausted { method, .. } => method,
        }
    }
}

/// Result type for RPC client operations.
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(RpcStatus::Unavailable("conn reset".into()).is_retryable());
        assert!(RpcStatus::DeadlineExceeded("2s".into()).is_retryable());
        assert!(RpcStatus::ResourceExhausted("quota".into()).is_retryable());
    }

    #[test]
    fn test_fatal_statuses() {
        assert!(!RpcStatus::InvalidArgument("bad id".into()).is_retryable());
        assert!(!RpcStatus::NotFound("missing".into()).is_retryable());
        assert!(!RpcStatus::Internal("panic".into()).is_retryable());
        assert!(!RpcStatus::Unknown("?".into()).is_retryable());
    }

    #[test]
    fn test_error_carries_method_annotation() {
        let err = RpcError::RetriesExhausted {
            method: "get_inventory".to_string(),
            attempts: 4,
            status: RpcStatus::Unavailable("down".into()),
        };
        assert_eq!(err.method(), "get_inventory");
        assert!(err.to_string().contains("get_inventory"));
        assert!(err.to_string().contains("4 attempts"));
    }
}
