//! Cart and cart line types.

use serde::{Deserialize, Serialize};

use crate::cart::CartTotals;
use crate::catalog::{Product, StockShortage};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// A product snapshot and how many units of it are wanted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// The product as it was when first added.
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    pub fn unit_price(&self, currency: Currency) -> Money {
        Money::new(self.product.price, currency)
    }

    /// `unit price * quantity`, unrounded.
    pub fn line_total(&self, currency: Currency) -> Result<Money, CommerceError> {
        self.unit_price(currency).try_multiply(self.quantity)
    }
}

/// Result of a quantity change that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// The line now holds this quantity.
    Set(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// No line for that product.
    Missing,
}

/// Ordered lines, at most one per product, in first-added order.
///
/// Stock ceilings are passed in by the caller; the cart itself never talks
/// to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == id)
    }

    /// Units of `id` in the cart, zero if absent.
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.line(id).map(|l| l.quantity).unwrap_or(0)
    }

    /// Add one unit of `product`, given `available` units in stock.
    ///
    /// Returns the line's new quantity. Rejected without changes when that
    /// quantity would exceed `available`.
    pub fn add_one(&mut self, product: &Product, available: u32) -> Result<u32, StockShortage> {
        match self.lines.iter_mut().find(|l| l.product_id() == product.id) {
            Some(line) => {
                let wanted = line.quantity.saturating_add(1);
                StockShortage::check(&line.product, wanted, available)?;
                line.quantity = wanted;
                Ok(wanted)
            }
            None => {
                StockShortage::check(product, 1, available)?;
                self.lines.push(CartLine {
                    product: product.clone(),
                    quantity: 1,
                });
                Ok(1)
            }
        }
    }

    /// Move a line's quantity by `delta`, given `available` units in stock.
    ///
    /// A result of zero or less removes the line. A result above
    /// `available` is rejected and the line keeps its quantity.
    pub fn change_quantity(
        &mut self,
        id: ProductId,
        delta: i64,
        available: u32,
    ) -> Result<LineChange, StockShortage> {
        let Some(index) = self.lines.iter().position(|l| l.product_id() == id) else {
            return Ok(LineChange::Missing);
        };

        let candidate = i64::from(self.lines[index].quantity).saturating_add(delta);
        if candidate <= 0 {
            self.lines.remove(index);
            return Ok(LineChange::Removed);
        }

        let line = &mut self.lines[index];
        let wanted = u32::try_from(candidate).unwrap_or(u32::MAX);
        StockShortage::check(&line.product, wanted, available)?;
        line.quantity = wanted;
        Ok(LineChange::Set(wanted))
    }

    /// Delete the line for `id`. Returns whether one was there.
    pub fn remove_line(&mut self, id: ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| l.product_id() != id);
        self.lines.len() < len_before
    }

    /// Clear all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Subtotal, tax and total. Recomputed on every call.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        let line_totals = self
            .lines
            .iter()
            .map(|l| l.line_total(self.currency))
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = Money::try_sum(&line_totals, self.currency)?;
        CartTotals::from_subtotal(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(id: u64, price: Decimal, stock: u32) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: format!("Product {}", id),
            price,
            stock,
            min_stock: None,
            category: String::new(),
            sku: None,
            supplier: None,
            image: None,
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn test_add_up_to_stock() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 3);

        assert_eq!(cart.add_one(&p, 3), Ok(1));
        assert_eq!(cart.add_one(&p, 3), Ok(2));
        assert_eq!(cart.add_one(&p, 3), Ok(3));

        let shortage = cart.add_one(&p, 3).unwrap_err();
        assert_eq!(shortage.requested, 4);
        assert_eq!(shortage.available, 3);
        assert_eq!(cart.quantity_of(p.id), 3);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_out_of_stock() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 0);

        let shortage = cart.add_one(&p, 0).unwrap_err();
        assert!(shortage.is_out_of_stock());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut cart = Cart::new(Currency::PHP);
        let a = product(5, dec!(1), 10);
        let b = product(2, dec!(1), 10);
        cart.add_one(&a, 10).unwrap();
        cart.add_one(&b, 10).unwrap();
        cart.add_one(&a, 10).unwrap();

        let ids: Vec<u64> = cart.lines().iter().map(|l| l.product_id().get()).collect();
        assert_eq!(ids, vec![5, 2]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_change_quantity() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 5);
        cart.add_one(&p, 5).unwrap();

        assert_eq!(cart.change_quantity(p.id, 3, 5), Ok(LineChange::Set(4)));
        assert_eq!(cart.change_quantity(p.id, -1, 5), Ok(LineChange::Set(3)));
    }

    #[test]
    fn test_change_quantity_over_stock_keeps_line() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 5);
        cart.add_one(&p, 5).unwrap();
        cart.change_quantity(p.id, 1, 5).unwrap();

        assert!(cart.change_quantity(p.id, 4, 5).is_err());
        assert_eq!(cart.quantity_of(p.id), 2);
        assert!(cart.change_quantity(p.id, i64::MAX, 5).is_err());
        assert_eq!(cart.quantity_of(p.id), 2);
    }

    #[test]
    fn test_large_negative_delta_removes_line() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 5);
        cart.add_one(&p, 5).unwrap();

        assert_eq!(cart.change_quantity(p.id, i64::MIN, 5), Ok(LineChange::Removed));
        assert!(cart.is_empty());
        assert_eq!(cart.change_quantity(p.id, 1, 5), Ok(LineChange::Missing));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 5);
        cart.add_one(&p, 5).unwrap();

        assert!(cart.remove_line(p.id));
        assert!(!cart.remove_line(p.id));
    }

    #[test]
    fn test_totals_are_idempotent() {
        let mut cart = Cart::new(Currency::PHP);
        let a = product(1, dec!(19.99), 10);
        let b = product(2, dec!(5.25), 10);
        cart.add_one(&a, 10).unwrap();
        cart.add_one(&a, 10).unwrap();
        cart.add_one(&b, 10).unwrap();

        let first = cart.totals().unwrap();
        let second = cart.totals().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.subtotal.amount, dec!(45.23));
        assert_eq!(first.tax.amount, dec!(5.4276));
        assert_eq!(first.total.amount, dec!(50.6576));
        assert_eq!(first.total.display(), "\u{20b1}50.66");
    }

    #[test]
    fn test_clear_gives_zero_totals() {
        let mut cart = Cart::new(Currency::PHP);
        let p = product(1, dec!(10), 5);
        cart.add_one(&p, 5).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.totals().unwrap(), CartTotals::zero(Currency::PHP));
    }
}
