//! Product catalog module.
//!
//! Contains the product record and stock checks.

mod inventory;
mod product;

pub use inventory::{LowStockItem, StockShortage};
pub use product::{Product, ProductCreate, ProductUpdate};
