/**
 * Backend Error Types
 *
 * Every call on a `RemoteBackend` fails with a `BackendError`. The variants
 * follow what the backend reports: authentication problems, missing or
 * conflicting documents, other HTTP failures, and transport failures where
 * no response was received at all.
 */

use thiserror::Error;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// No active session, bad credentials, or insufficient scope (401)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The addressed account, document or file does not exist (404)
    #[error("Not found: {message}")]
    NotFound {
        message: String,
    },

    /// The resource already exists (409)
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Any other non-success response
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
    },

    /// The request never produced a response
    #[error("Transport error: {message}")]
    Transport {
        message: String,
    },

    /// The backend cannot perform this operation with the current setup
    #[error("Unsupported operation {operation}: {message}")]
    Unsupported {
        operation: &'static str,
        message: String,
    },

    /// A URL could not be built from the configured endpoint
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        message: String,
    },

    /// Shared error (e.g. a document that does not decode)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            message: message.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, when there was a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The backend answered with success but the body could not be read.
    /// For a write, the change has been applied.
    pub fn is_unreadable_response(&self) -> bool {
        matches!(self, Self::SharedError(_) | Self::SerializationError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::unauthorized("x").status_code(), Some(401));
        assert_eq!(BackendError::not_found("x").status_code(), Some(404));
        assert_eq!(BackendError::conflict("x").status_code(), Some(409));
        assert_eq!(BackendError::http(503, "down").status_code(), Some(503));
        assert_eq!(BackendError::transport("refused").status_code(), None);
    }

    #[test]
    fn test_predicates() {
        assert!(BackendError::not_found("doc").is_not_found());
        assert!(!BackendError::not_found("doc").is_unauthorized());
        assert!(BackendError::unauthorized("session").is_unauthorized());
        assert!(BackendError::from(SharedError::serialization("bad")).is_unreadable_response());
        assert!(!BackendError::http(500, "down").is_unreadable_response());
        assert!(!BackendError::transport("refused").is_unreadable_response());
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::serialization("bad").into();
        match backend_error {
            BackendError::SharedError(_) => {}
            _ => panic!("Expected SharedError variant"),
        }
    }

    #[test]
    fn test_display() {
        let error = BackendError::unsupported("delete_account", "api key required");
        let display = error.to_string();
        assert!(display.contains("delete_account"));
        assert!(display.contains("api key required"));
    }
}
