//! Error types for the service finder client.
//!
//! This module defines the centralized error type [`ServiceFinderError`] and a type
//! alias [`Result`] used throughout the crate. The `Display` text of an error is what
//! ends up in a resource's `error` field, so every message is written to be shown
//! to a user as-is.

use std::time::Duration;
use thiserror::Error;

/// The main error type for client operations.
///
/// Covers transport failures, server rejections, input validation, device
/// capability refusals and authentication failures. None of these is fatal to the
/// process; callers degrade to a visible message.
///
/// # Examples
///
/// ```
/// use service_finder::ServiceFinderError;
///
/// let err = ServiceFinderError::Status {
///     status: 404,
///     message: "Request failed with status code 404".to_string(),
/// };
/// assert_eq!(err.to_string(), "Request failed with status code 404");
/// ```
#[derive(Debug, Error)]
pub enum ServiceFinderError {
    /// The request never produced a response (DNS, connection refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The client-wide request timeout elapsed before a response arrived.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-success status.
    ///
    /// `message` is the server-provided message when the body carries one,
    /// otherwise a generic status line.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable failure description.
        message: String,
    },

    /// The response body did not have the expected `{ "data": ... }` shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// A backend request issued by the store failed.
    ///
    /// Carries the message recorded in the resource's `error` field, so the caller
    /// and the view agree on the text.
    #[error("{0}")]
    Request(String),

    /// Input was rejected before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// A device capability (location, camera roll) was refused by the user.
    #[error("{0}")]
    PermissionDenied(String),

    /// The authentication provider rejected the operation.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal dispatch failure (poisoned state lock, misrouted response).
    #[error("Worker error: {0}")]
    Worker(String),
}

impl ServiceFinderError {
    /// Returns the HTTP status code for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for service finder operations.
pub type Result<T> = std::result::Result<T, ServiceFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_reports_milliseconds() {
        let err = ServiceFinderError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Request timed out after 10000ms");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = ServiceFinderError::Validation("Please fill all fields".into());
        assert_eq!(err.to_string(), "Please fill all fields");
        assert_eq!(err.status(), None);
    }
}
