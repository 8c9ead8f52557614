//! Checkout error types.

use pos_data::ApiError;
use thiserror::Error;

use crate::catalog::StockShortage;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::sales::Sale;

/// A cart change that was refused. The cart is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartRejection {
    /// Not enough mirrored stock for the requested quantity.
    #[error(transparent)]
    InsufficientStock(#[from] StockShortage),

    /// The last sale's receipt has not been dismissed yet.
    #[error("A receipt is still open; dismiss it before starting a new sale")]
    ReceiptOpen,
}

/// One cart line whose sale could not be created.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFailure {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub error: ApiError,
}

/// Why a commit did not settle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Nothing to commit.
    #[error("Cart is empty")]
    EmptyCart,

    /// The last sale's receipt has not been dismissed yet.
    #[error("A receipt is still open; dismiss it before starting a new sale")]
    ReceiptOpen,

    /// Re-fetching stock before commit failed. Nothing was sent.
    #[error("Could not refresh stock: {0}")]
    Refresh(#[source] ApiError),

    /// Fresh stock no longer covers one or more lines. Nothing was sent.
    #[error("Stock validation failed for {} line(s)", count(.shortages))]
    StockValidationFailed { shortages: Vec<StockShortage> },

    /// At least one sale creation failed. Sales in `committed` were
    /// created and are not rolled back.
    #[error("{} of {} sale(s) failed: {}", count(.failed), attempted(.committed, .failed), first_message(.failed))]
    CommitFailed {
        committed: Vec<Sale>,
        failed: Vec<LineFailure>,
    },

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] CommerceError),
}

fn count<T>(items: &[T]) -> usize {
    items.len()
}

fn attempted(committed: &[Sale], failed: &[LineFailure]) -> usize {
    committed.len() + failed.len()
}

fn first_message(failed: &[LineFailure]) -> &str {
    failed.first().map(|f| f.error.message.as_str()).unwrap_or("")
}

impl CheckoutError {
    /// Whether some sales were created before the failure, so server
    /// inventory may already be reduced.
    pub fn inventory_may_be_reduced(&self) -> bool {
        matches!(self, CheckoutError::CommitFailed { committed, .. } if !committed.is_empty())
    }

    /// Whether every failed call failed without reaching the server.
    pub fn is_network(&self) -> bool {
        match self {
            CheckoutError::Refresh(err) => err.is_network(),
            CheckoutError::CommitFailed { failed, .. } => {
                !failed.is_empty() && failed.iter().all(|f| f.error.is_network())
            }
            _ => false,
        }
    }

    /// The first server error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CheckoutError::Refresh(err) => Some(err),
            CheckoutError::CommitFailed { failed, .. } => failed.first().map(|f| &f.error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(error: ApiError) -> LineFailure {
        LineFailure {
            product_id: ProductId::new(1).unwrap(),
            product_name: "Rice".to_string(),
            quantity: 2,
            error,
        }
    }

    #[test]
    fn test_commit_failed_message() {
        let err = CheckoutError::CommitFailed {
            committed: Vec::new(),
            failed: vec![failure(ApiError::http(400, "error: Insufficient stock"))],
        };
        assert_eq!(err.to_string(), "1 of 1 sale(s) failed: error: Insufficient stock");
        assert!(!err.inventory_may_be_reduced());
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_classification() {
        let err = CheckoutError::CommitFailed {
            committed: Vec::new(),
            failed: vec![failure(ApiError::network("offline"))],
        };
        assert!(err.is_network());
        assert!(CheckoutError::Refresh(ApiError::network("offline")).is_network());
        assert!(!CheckoutError::EmptyCart.is_network());
    }
}
