//! HTTP client error types.

use serde_json::Value;
use thiserror::Error;

/// Error returned by every request made through the client.
///
/// There is a single error type for both failure families. A response that
/// arrived with a non-2xx status carries that status; a request that never
/// got a response carries [`ApiError::NETWORK`] (`0`). Callers tell the two
/// apart with [`ApiError::is_network`], never by matching on a variant.
/// Requests that could not be built at all carry [`ApiError::LOCAL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status code, `0` when no response was received, or `1` when the
    /// request was never sent.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Sentinel status for transport failures.
    pub const NETWORK: u16 = 0;

    /// Sentinel status for requests that failed before reaching the transport.
    pub const LOCAL: u16 = 1;

    /// Create an error for a response with the given status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create an error for a request that never received a response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::http(Self::NETWORK, message)
    }

    /// Create an error for a JSON body that could not be encoded or decoded
    /// on this side of the wire.
    pub fn serialization(e: serde_json::Error) -> Self {
        Self::http(Self::LOCAL, format!("JSON error: {}", e))
    }

    /// Build an error from a non-2xx response body.
    ///
    /// The body may be `{"message": "..."}` or a map of field name to a
    /// string or list of strings. Field errors are flattened into
    /// `field: a, b; other: c` in server order. Anything else falls back to
    /// a generic status message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let fallback = format!("HTTP error! status: {}", status);
        let parsed: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return Self::http(status, fallback),
        };

        let Value::Object(map) = parsed else {
            return Self::http(status, fallback);
        };

        if let Some(message) = map.get("message").and_then(Value::as_str) {
            if !message.is_empty() {
                return Self::http(status, message);
            }
        }

        let flattened = map
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, flatten_errors(errors)))
            .collect::<Vec<_>>()
            .join("; ");

        if flattened.is_empty() {
            Self::http(status, fallback)
        } else {
            Self::http(status, flattened)
        }
    }

    /// Whether the request failed before any response arrived.
    pub fn is_network(&self) -> bool {
        self.status == Self::NETWORK
    }

    /// Whether the request failed locally and was never sent.
    pub fn is_local(&self) -> bool {
        self.status == Self::LOCAL
    }
}

fn flatten_errors(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
