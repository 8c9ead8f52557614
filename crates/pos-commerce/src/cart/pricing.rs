//! Cart pricing calculations.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Sales tax applied once to the cart subtotal.
pub const TAX_RATE: Decimal = dec!(0.12);

/// Subtotal, tax and total for a cart. Amounts are exact; use
/// [`CartTotals::rounded`] or [`Money::display`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// `subtotal * TAX_RATE`.
    pub tax: Money,
    /// `subtotal + tax`.
    pub total: Money,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            subtotal: zero,
            tax: zero,
            total: zero,
        }
    }

    /// Derive tax and total from a subtotal.
    pub fn from_subtotal(subtotal: Money) -> Result<Self, CommerceError> {
        let tax = subtotal.try_scale(TAX_RATE)?;
        let total = subtotal.try_add(&tax)?;
        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }

    /// Each figure rounded to the currency's minor unit.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.rounded(),
            tax: self.tax.rounded(),
            total: self.total.rounded(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_from_subtotal() {
        let totals = CartTotals::from_subtotal(Money::new(dec!(100), Currency::PHP)).unwrap();
        assert_eq!(totals.tax.amount, dec!(12));
        assert_eq!(totals.total.amount, dec!(112));
    }

    #[test]
    fn test_tax_is_exact_until_display() {
        let totals = CartTotals::from_subtotal(Money::new(dec!(10.05), Currency::PHP)).unwrap();
        assert_eq!(totals.tax.amount, dec!(1.206));
        assert_eq!(totals.total.amount, dec!(11.256));

        let rounded = totals.rounded();
        assert_eq!(rounded.tax.amount, dec!(1.21));
        assert_eq!(rounded.total.amount, dec!(11.26));
        assert_eq!(totals.total.display(), "\u{20b1}11.26");
    }

    #[test]
    fn test_zero_totals() {
        let totals = CartTotals::zero(Currency::PHP);
        assert!(totals.is_zero());
        assert_eq!(totals, CartTotals::from_subtotal(Money::zero(Currency::PHP)).unwrap());
    }
}
