//! # Client Error Types
//!
//! Unified error handling for the billing API gateway, the audit workflow and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when a failed call carries no usable service message
pub const GENERIC_SERVICE_MESSAGE: &str =
    "An unexpected error occurred while contacting the billing service.";

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local precondition failure; never reaches the network
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network failure or non-2xx response from the billing service
    #[error("Transport error: {0}")]
    Transport(ErrorEnvelope),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Config file could not be read or written
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClientError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// The normalized envelope, for transport failures only
    #[must_use]
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ClientError::Transport(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Best available message to show a person
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message) => message.clone(),
            ClientError::Transport(envelope) => envelope.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Check if error is transient (a later manual attempt may succeed).
    ///
    /// Nothing in this crate retries automatically.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::Transport(envelope) => match envelope.http_status {
                None => true,
                Some(status) => status >= 500,
            },
            _ => false,
        }
    }
}

/// Normalized shape of every failed gateway call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status, absent when no response was received
    pub http_status: Option<u16>,
    /// Message reported by the service itself
    pub service_message: Option<String>,
    /// Raw response body (or transport error text)
    pub raw: Value,
}

impl ErrorEnvelope {
    /// Build an envelope from a non-2xx response body.
    ///
    /// The service reports failures as `{"message": ...}`; `error` and `detail`
    /// are accepted as fallbacks. Non-JSON bodies are kept verbatim in `raw`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let raw = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| Value::String(body.to_string()));

        let service_message = ["message", "error", "detail"]
            .iter()
            .filter_map(|key| raw.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(str::to_string);

        Self {
            http_status: Some(status),
            service_message,
            raw,
        }
    }

    /// Build an envelope for a request that never produced a response
    pub fn from_network_failure(reason: impl Into<String>) -> Self {
        Self {
            http_status: None,
            service_message: None,
            raw: Value::String(reason.into()),
        }
    }

    /// Service message, or the generic fallback when the service gave none
    #[must_use]
    pub fn message(&self) -> &str {
        self.service_message
            .as_deref()
            .unwrap_or(GENERIC_SERVICE_MESSAGE)
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message()),
            None => write!(f, "no response: {}", self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_from_json_message() {
        let envelope = ErrorEnvelope::from_response(404, r#"{"message": "Claim not found"}"#);
        assert_eq!(envelope.http_status, Some(404));
        assert_eq!(envelope.service_message.as_deref(), Some("Claim not found"));
        assert_eq!(envelope.message(), "Claim not found");
        assert_eq!(envelope.raw, json!({"message": "Claim not found"}));
    }

    #[test]
    fn test_envelope_falls_back_to_error_field() {
        let envelope = ErrorEnvelope::from_response(400, r#"{"error": "bad payload"}"#);
        assert_eq!(envelope.message(), "bad payload");
    }

    #[test]
    fn test_envelope_without_message_uses_generic_text() {
        let envelope = ErrorEnvelope::from_response(500, "<html>Internal Server Error</html>");
        assert_eq!(envelope.service_message, None);
        assert_eq!(envelope.message(), GENERIC_SERVICE_MESSAGE);
        assert_eq!(
            envelope.raw,
            Value::String("<html>Internal Server Error</html>".to_string())
        );
    }

    #[test]
    fn test_blank_service_message_is_absent() {
        let envelope = ErrorEnvelope::from_response(422, r#"{"message": "   "}"#);
        assert_eq!(envelope.service_message, None);
    }

    #[test]
    fn test_network_failure_envelope() {
        let envelope = ErrorEnvelope::from_network_failure("connection refused");
        assert_eq!(envelope.http_status, None);
        assert_eq!(envelope.message(), GENERIC_SERVICE_MESSAGE);
        assert!(envelope.to_string().contains("connection refused"));
    }

    #[test]
    fn test_recoverability() {
        let server = ClientError::Transport(ErrorEnvelope::from_response(503, ""));
        let client = ClientError::Transport(ErrorEnvelope::from_response(404, ""));
        let network = ClientError::Transport(ErrorEnvelope::from_network_failure("timeout"));
        assert!(server.is_recoverable());
        assert!(!client.is_recoverable());
        assert!(network.is_recoverable());
        assert!(!ClientError::validation("missing id").is_recoverable());
    }

    #[test]
    fn test_user_message() {
        let err = ClientError::validation("Please enter a Claim ID");
        assert_eq!(err.user_message(), "Please enter a Claim ID");

        let err = ClientError::Transport(ErrorEnvelope::from_response(
            404,
            r#"{"message": "Claim not found"}"#,
        ));
        assert_eq!(err.user_message(), "Claim not found");
        assert!(err.envelope().is_some());
    }
}
