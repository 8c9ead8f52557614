//! Stock checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::normalize;

/// A request for more units than the mirror says are on hand.
///
/// Produced locally and synchronously; it never comes from the network.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Insufficient stock for {product_name}: requested {requested}, available {available}")]
pub struct StockShortage {
    pub product_id: ProductId,
    pub product_name: String,
    pub requested: u32,
    pub available: u32,
}

impl StockShortage {
    /// Check `requested` units of `product` against `available`.
    pub fn check(product: &Product, requested: u32, available: u32) -> Result<(), StockShortage> {
        if requested <= available {
            Ok(())
        } else {
            Err(StockShortage {
                product_id: product.id,
                product_name: product.name.clone(),
                requested,
                available,
            })
        }
    }

    /// Whether the product has no stock at all.
    pub fn is_out_of_stock(&self) -> bool {
        self.available == 0
    }
}

/// Row of the dashboard's low-stock list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub name: String,
    #[serde(with = "normalize::count")]
    pub stock: u32,
    #[serde(default, with = "normalize::count")]
    pub min_stock: u32,
    #[serde(default)]
    pub category: String,
}

impl LowStockItem {
    /// Units needed to get back to the threshold.
    pub fn shortfall(&self) -> u32 {
        self.min_stock.saturating_sub(self.stock)
    }
}

impl From<&Product> for LowStockItem {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            stock: product.stock,
            min_stock: product.min_stock.unwrap_or_default(),
            category: product.category.clone(),
        }
    }
}
