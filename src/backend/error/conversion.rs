/**
 * Error Conversion
 *
 * Maps HTTP responses and `reqwest` failures onto `BackendError`.
 *
 * Error bodies from the backend look like:
 * ```json
 * { "message": "Document not found", "code": 404, "type": "document_not_found" }
 * ```
 */

use serde::Deserialize;
use crate::backend::error::types::BackendError;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl BackendError {
    /// Build an error from a non-success status and its response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => match parsed.kind {
                Some(kind) => format!("{} ({})", parsed.message, kind),
                None => parsed.message,
            },
            Err(_) if body.trim().is_empty() => format!("status {}", status),
            Err(_) => body.trim().to_string(),
        };

        match status {
            401 => Self::unauthorized(message),
            404 => Self::not_found(message),
            409 => Self::conflict(message),
            _ => Self::http(status, message),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::SharedError(crate::shared::SharedError::serialization(err.to_string()));
        }
        match err.status() {
            Some(status) => Self::http(status.as_u16(), err.to_string()),
            None => Self::transport(err.to_string()),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for BackendError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::transport(format!("invalid header value: {}", err))
    }
}
