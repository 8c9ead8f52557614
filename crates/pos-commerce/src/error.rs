//! Commerce error types.

use thiserror::Error;

/// Errors raised by local domain operations (ids, money, parsing).
///
/// Failures that come back from the backend are [`pos_data::ApiError`]s;
/// checkout has its own richer error in [`crate::checkout::CheckoutError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// An id that is zero or otherwise unusable.
    #[error("Invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: u64 },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Unknown payment method name.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
