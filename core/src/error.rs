//! Error types for the todo API client.
//!
//! # Design
//! One closed enum covers every failure a caller can see. `Validation` never
//! reaches the network, `Api` means the server answered with a non-2xx
//! status, `Network` means no response arrived, and `Unexpected` covers the
//! rest (serialization, local storage, programming errors). Hooks match on
//! the variant instead of inspecting error shapes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected on the client before any request was issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server returned a non-2xx status. `message` is the server's
    /// `{"message": ...}` field when present, else the raw body when
    /// non-empty.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Api { status: u16, message: Option<String> },

    /// The request was sent but no response was received.
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_message() {
        let err = ApiError::Api {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 401: Invalid credentials");

        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 500: <no message>");
    }

    #[test]
    fn not_found_is_derived_from_status() {
        let err = ApiError::Api {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!ApiError::Network("refused".to_string()).is_not_found());
    }
}
