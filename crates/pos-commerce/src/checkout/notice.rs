//! Operator-facing notices.
//!
//! Every checkout outcome maps to a short title and a one-line
//! description suitable for a toast or a terminal line.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::StockShortage;
use crate::checkout::{CartRejection, CheckoutError, Receipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Notice for a settled checkout.
    pub fn payment_successful(receipt: &Receipt) -> Self {
        Notice::success(
            "Payment successful",
            format!(
                "Order #{} completed using {} payment.",
                receipt.order_number,
                receipt.payment_method.as_str()
            ),
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

impl From<&StockShortage> for Notice {
    fn from(shortage: &StockShortage) -> Self {
        let description = match shortage.available {
            0 => "This product is out of stock.".to_string(),
            1 => "Only 1 unit available.".to_string(),
            n => format!("Only {} units available.", n),
        };
        Notice::error("Insufficient stock", description)
    }
}

impl From<&CartRejection> for Notice {
    fn from(rejection: &CartRejection) -> Self {
        match rejection {
            CartRejection::InsufficientStock(shortage) => shortage.into(),
            CartRejection::ReceiptOpen => Notice::error(
                "Receipt open",
                "Finish or dismiss the current receipt before starting a new sale.",
            ),
        }
    }
}

impl From<&CheckoutError> for Notice {
    fn from(err: &CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => {
                Notice::error("Cart is empty", "Add products before checking out.")
            }
            CheckoutError::ReceiptOpen => (&CartRejection::ReceiptOpen).into(),
            CheckoutError::StockValidationFailed { .. } => Notice::error(
                "Stock validation failed",
                "Some items in your cart are out of stock or have insufficient quantity. \
                 Please update your cart.",
            ),
            CheckoutError::Pricing(e) => Notice::error("Payment failed", e.to_string()),
            CheckoutError::Refresh(_) | CheckoutError::CommitFailed { .. } => {
                let mut description = if err.is_network() {
                    "Network error. Please check your connection and try again.".to_string()
                } else {
                    match err.api_error() {
                        Some(api) if api.message.contains("Insufficient stock") => {
                            "Cannot complete payment: Some items are out of stock or quantity \
                             has changed."
                                .to_string()
                        }
                        Some(api) => api.message.clone(),
                        None => err.to_string(),
                    }
                };
                if let CheckoutError::CommitFailed { committed, .. } = err {
                    if !committed.is_empty() {
                        description.push_str(&format!(
                            " {} item(s) were already recorded; inventory may already be reduced.",
                            committed.len()
                        ));
                    }
                }
                Notice::error("Payment failed", description)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::LineFailure;
    use crate::ids::ProductId;
    use pos_data::ApiError;

    fn shortage(available: u32) -> StockShortage {
        StockShortage {
            product_id: ProductId::new(1).unwrap(),
            product_name: "Rice".to_string(),
            requested: available + 1,
            available,
        }
    }

    fn commit_failed(error: ApiError) -> CheckoutError {
        CheckoutError::CommitFailed {
            committed: Vec::new(),
            failed: vec![LineFailure {
                product_id: ProductId::new(1).unwrap(),
                product_name: "Rice".to_string(),
                quantity: 1,
                error,
            }],
        }
    }

    #[test]
    fn test_insufficient_stock_notice() {
        let notice = Notice::from(&shortage(0));
        assert_eq!(notice.title, "Insufficient stock");
        assert_eq!(notice.description, "This product is out of stock.");

        assert_eq!(Notice::from(&shortage(1)).description, "Only 1 unit available.");
        assert_eq!(Notice::from(&shortage(4)).description, "Only 4 units available.");
    }

    #[test]
    fn test_stock_validation_notice() {
        let err = CheckoutError::StockValidationFailed {
            shortages: vec![shortage(0)],
        };
        let notice = Notice::from(&err);
        assert_eq!(notice.title, "Stock validation failed");
        assert!(notice.is_error());
    }

    #[test]
    fn test_payment_failed_network() {
        let notice = Notice::from(&commit_failed(ApiError::network("connection refused")));
        assert_eq!(notice.title, "Payment failed");
        assert!(notice.description.starts_with("Network error"));
    }

    #[test]
    fn test_payment_failed_insufficient_stock_from_server() {
        let err = commit_failed(ApiError::http(
            400,
            "error: Payment processing failed. Insufficient stock or other error.",
        ));
        let notice = Notice::from(&err);
        assert!(notice.description.starts_with("Cannot complete payment"));
    }

    #[test]
    fn test_payment_failed_other_message() {
        let notice = Notice::from(&commit_failed(ApiError::http(400, "quantity: too large")));
        assert_eq!(notice.description, "quantity: too large");
    }
}
