//! Settled-sale receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::{CartLine, CartTotals};
use crate::error::CommerceError;
use crate::ids::{CustomerId, ProductId};
use crate::money::{Currency, Money};
use crate::sales::{PaymentMethod, Sale};

/// One printed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    /// Stock on the server just before the sale was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_before: Option<u32>,
    /// Stock after the sale, from the refresh that follows the commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_after: Option<u32>,
}

impl ReceiptLine {
    pub fn from_cart_line(line: &CartLine, currency: Currency) -> Result<Self, CommerceError> {
        Ok(Self {
            product_id: line.product_id(),
            name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price(currency),
            line_total: line.line_total(currency)?,
            stock_before: None,
            stock_after: None,
        })
    }
}

/// Snapshot of a settled checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Four-digit order number shown to the customer.
    pub order_number: String,
    pub customer: CustomerId,
    pub lines: Vec<ReceiptLine>,
    pub totals: CartTotals,
    pub payment_method: PaymentMethod,
    /// Sales the server created, one per line.
    pub sales: Vec<Sale>,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Order number derived from the first created sale id, zero-padded to
    /// four digits.
    pub fn order_number_for(sales: &[Sale]) -> String {
        let seed = sales.iter().map(|s| s.id.get()).min().unwrap_or(0);
        format!("{:04}", seed % 10_000)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether post-sale stock is known for any line.
    pub fn has_inventory(&self) -> bool {
        self.lines.iter().any(|l| l.stock_after.is_some())
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order #{}", self.order_number)?;
        writeln!(f, "{}", self.issued_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "{}", "-".repeat(40))?;
        for line in &self.lines {
            let label = format!("{} x{}", line.name, line.quantity);
            writeln!(f, "{:<28}{:>12}", label, line.line_total.display())?;
        }
        writeln!(f, "{}", "-".repeat(40))?;
        let totals = self.totals.rounded();
        writeln!(f, "{:<28}{:>12}", "Subtotal", totals.subtotal.display())?;
        writeln!(f, "{:<28}{:>12}", "Tax (12%)", totals.tax.display())?;
        writeln!(f, "{:<28}{:>12}", "Total", totals.total.display())?;
        write!(f, "Paid by {}", self.payment_method.display_name())?;

        if self.has_inventory() {
            writeln!(f)?;
            writeln!(f, "{}", "-".repeat(40))?;
            write!(f, "Updated Inventory")?;
            for line in &self.lines {
                let Some(after) = line.stock_after else {
                    continue;
                };
                let before = line
                    .stock_before
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "?".to_string());
                writeln!(f)?;
                writeln!(f, "{}", line.name)?;
                write!(f, "  Stock: {} \u{2192} {}  Sold: {}", before, after, line.quantity)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::resource::Related;
    use crate::sales::PaymentStatus;
    use rust_decimal_macros::dec;

    fn sale(id: u64) -> Sale {
        Sale {
            id: crate::ids::SaleId::new(id).unwrap(),
            customer: Related::Reference(CustomerId::new(1).unwrap()),
            product: Related::Reference(ProductId::new(1).unwrap()),
            quantity: 1,
            total_price: dec!(10),
            sale_date: None,
            payment_status: PaymentStatus::Completed,
            payment_method: Some(PaymentMethod::Cash),
        }
    }

    #[test]
    fn test_order_number_is_zero_padded() {
        assert_eq!(Receipt::order_number_for(&[sale(42), sale(41)]), "0041");
        assert_eq!(Receipt::order_number_for(&[sale(123_456)]), "3456");
        assert_eq!(Receipt::order_number_for(&[]), "0000");
    }

    #[test]
    fn test_receipt_text() {
        let product = Product {
            id: ProductId::new(1).unwrap(),
            name: "Coffee".to_string(),
            price: dec!(10.05),
            stock: 5,
            min_stock: None,
            category: String::new(),
            sku: None,
            supplier: None,
            image: None,
            description: None,
            created_at: None,
        };
        let line = CartLine { product, quantity: 1 };
        let totals =
            CartTotals::from_subtotal(Money::new(dec!(10.05), Currency::PHP)).unwrap();
        let receipt = Receipt {
            order_number: "0007".to_string(),
            customer: CustomerId::new(1).unwrap(),
            lines: vec![ReceiptLine::from_cart_line(&line, Currency::PHP).unwrap()],
            totals,
            payment_method: PaymentMethod::Card,
            sales: vec![sale(7)],
            issued_at: Utc::now(),
        };

        let text = receipt.to_string();
        assert!(text.starts_with("Order #0007"));
        assert!(text.contains("Coffee x1"));
        assert!(text.contains("\u{20b1}11.26"));
        assert!(text.ends_with("Paid by Card"));
        assert!(!text.contains("Updated Inventory"));
        assert_eq!(receipt.item_count(), 1);
    }

    #[test]
    fn test_receipt_lists_updated_inventory() {
        let line = ReceiptLine {
            product_id: ProductId::new(2).unwrap(),
            name: "Instant Coffee".to_string(),
            quantity: 2,
            unit_price: Money::new(dec!(12.75), Currency::PHP),
            line_total: Money::new(dec!(25.50), Currency::PHP),
            stock_before: Some(3),
            stock_after: Some(1),
        };
        let totals =
            CartTotals::from_subtotal(Money::new(dec!(25.50), Currency::PHP)).unwrap();
        let receipt = Receipt {
            order_number: "0100".to_string(),
            customer: CustomerId::new(1).unwrap(),
            lines: vec![line],
            totals,
            payment_method: PaymentMethod::Cash,
            sales: vec![sale(100)],
            issued_at: Utc::now(),
        };

        assert!(receipt.has_inventory());
        let text = receipt.to_string();
        assert!(text.contains("Paid by Cash\n"));
        assert!(text.contains("Updated Inventory"));
        assert!(text.ends_with("Stock: 3 \u{2192} 1  Sold: 2"));

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["lines"][0]["stock_before"], 3);
        assert_eq!(json["lines"][0]["stock_after"], 1);
    }
}
