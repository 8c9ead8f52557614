//! Product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::normalize;
use crate::resource::Entity;

/// A sellable product as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    #[serde(with = "normalize::decimal")]
    pub price: Decimal,
    /// Units on hand.
    #[serde(with = "normalize::count")]
    pub stock: u32,
    /// Reorder threshold.
    #[serde(default, with = "normalize::opt_count", skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Supplier name.
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Image URL.
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether nothing is left to sell.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Whether stock has fallen below the reorder threshold.
    ///
    /// Matches the backend's dashboard rule (`stock < min_stock`), so a
    /// product with no threshold is never low.
    pub fn is_low_stock(&self) -> bool {
        self.min_stock.is_some_and(|min| self.stock < min)
    }

    /// Whether `quantity` units can be taken from current stock.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        quantity <= self.stock
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;

    const PATH: &'static str = "/products/";
    const PLURAL: &'static str = "products";

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Body for `POST /products/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(with = "normalize::decimal")]
    pub price: Decimal,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductCreate {
    /// Minimal product with the required fields.
    pub fn new(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            min_stock: None,
            category: String::new(),
            sku: None,
            supplier: None,
            image: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_min_stock(mut self, min_stock: u32) -> Self {
        self.min_stock = Some(min_stock);
        self
    }
}

/// Partial body for `PUT /products/{id}/`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        with = "normalize::opt_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductUpdate {
    /// An update that only sets stock.
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn server_product() -> serde_json::Value {
        json!({
            "id": 7,
            "name": "Jasmine Rice 5kg",
            "price": "249.50",
            "stock": "12",
            "min_stock": 15,
            "category": "Groceries",
            "sku": "RICE-5",
            "supplier": "",
            "image": "",
            "description": "",
            "created_at": "2024-03-01T08:30:00Z"
        })
    }

    #[test]
    fn test_product_from_server_json() {
        let product: Product = serde_json::from_value(server_product()).unwrap();
        assert_eq!(product.id.get(), 7);
        assert_eq!(product.price, dec!(249.50));
        assert_eq!(product.stock, 12);
        assert_eq!(product.min_stock, Some(15));
        assert_eq!(product.sku.as_deref(), Some("RICE-5"));
        assert_eq!(product.supplier, None);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_product_round_trips_to_numeric_json() {
        let product: Product = serde_json::from_value(server_product()).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(249.5));
        assert_eq!(value["stock"], json!(12));
        assert!(value.get("supplier").is_none());
    }

    #[test]
    fn test_product_stock_flags() {
        let mut product: Product = serde_json::from_value(server_product()).unwrap();
        assert!(product.is_low_stock());
        assert!(product.can_fulfill(12));
        assert!(!product.can_fulfill(13));

        product.min_stock = None;
        assert!(!product.is_low_stock());

        product.stock = 0;
        assert!(product.is_out_of_stock());
    }

    #[test]
    fn test_update_only_sends_set_fields() {
        let body = serde_json::to_value(ProductUpdate::stock(4)).unwrap();
        assert_eq!(body, json!({"stock": 4}));

        let body = serde_json::to_value(ProductUpdate {
            price: Some(dec!(10.25)),
            ..ProductUpdate::default()
        })
        .unwrap();
        assert_eq!(body, json!({"price": 10.25}));
    }

    #[test]
    fn test_create_body() {
        let body = serde_json::to_value(
            ProductCreate::new("Soap", dec!(35), 40)
                .with_category("Household")
                .with_min_stock(10),
        )
        .unwrap();
        assert_eq!(body["price"], json!(35.0));
        assert_eq!(body["category"], "Household");
        assert_eq!(body["min_stock"], 10);
        assert!(body.get("sku").is_none());
    }
}
