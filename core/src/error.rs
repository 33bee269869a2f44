//! Error types for the System controller client.
//!
//! # Design
//! `Call` is the only variant a successful round-trip can produce, and only
//! when the configured exception factory flags the response. Everything else
//! describes a request that never finished (`Cancelled`, `Transport`), a body
//! that did not match the model (`Deserialization`), or a bad `Configuration`.

use thiserror::Error;

/// Errors returned by `SystemApi` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The exception factory rejected the response.
    #[error("{message} (HTTP {status})")]
    Call {
        status: u16,
        message: String,
        body: String,
    },

    /// The cancellation token fired before the transport completed.
    #[error("request cancelled")]
    Cancelled,

    /// The request did not produce an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by a `Call` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Call { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_error_exposes_status() {
        let err = ApiError::Call {
            status: 503,
            message: "Error calling GetStatus: down".to_string(),
            body: "down".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Error calling GetStatus: down (HTTP 503)");
    }

    #[test]
    fn non_call_errors_have_no_status() {
        assert_eq!(ApiError::Cancelled.status(), None);
        assert_eq!(ApiError::Transport("refused".to_string()).status(), None);
    }

    #[test]
    fn serde_errors_convert() {
        let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
