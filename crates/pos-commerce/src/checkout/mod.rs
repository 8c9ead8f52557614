//! Checkout module.
//!
//! Contains the checkout session and state machine, and the receipts,
//! errors and notices it produces.

mod error;
mod flow;
mod notice;
mod receipt;
mod session;

pub use error::{CartRejection, CheckoutError, LineFailure};
pub use flow::CheckoutState;
pub use notice::{Notice, NoticeLevel};
pub use receipt::{Receipt, ReceiptLine};
pub use session::CheckoutSession;
