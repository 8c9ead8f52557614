//! Shopping cart module.
//!
//! Contains the cart, its lines and totals.

#[allow(clippy::module_inception)]
mod cart;
mod pricing;

pub use cart::{Cart, CartLine, LineChange};
pub use pricing::{CartTotals, TAX_RATE};
