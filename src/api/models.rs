//! Wire models for the REST backend.
//!
//! The backend wraps every payload as `{ "data": ... }` and reports failures with
//! either a `message` or an `error` field. These types stay private to the API layer;
//! callers only ever see domain types.

use serde::{Deserialize, Serialize};

/// Response envelope: `{ "data": T }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Best-effort error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Returns the server-provided failure text, preferring `message`.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "Service not found", "error": "NotFound"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Service not found"));
    }

    #[test]
    fn error_body_falls_back_to_error_field() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "bad category"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad category"));

        let empty: ErrorBody = serde_json::from_str(r#"{"message": " "}"#).unwrap();
        assert_eq!(empty.into_message(), None);
    }
}
