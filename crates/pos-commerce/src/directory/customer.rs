//! Customer records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::CustomerId;
use crate::normalize;
use crate::resource::Entity;

fn default_status() -> String {
    "active".to_string()
}

/// A customer. Purchase tallies are maintained by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form status; the server defaults it to `active`.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, with = "normalize::count")]
    pub total_purchases: u32,
    #[serde(default, with = "normalize::decimal")]
    pub total_spent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;

    const PATH: &'static str = "/customers/";
    const PLURAL: &'static str = "customers";

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// Body for `POST /customers/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: String,
}

impl CustomerCreate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            status: default_status(),
        }
    }
}

/// Partial body for `PUT /customers/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_customer_from_server_json() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 1,
            "name": "Walk-in Customer",
            "email": "walkin@store.local",
            "phone": "",
            "address": "",
            "status": "active",
            "total_purchases": 14,
            "total_spent": "5120.75",
            "last_visit": "2024-05-02",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(customer.id.get(), 1);
        assert_eq!(customer.total_spent, dec!(5120.75));
        assert_eq!(customer.total_purchases, 14);
        assert_eq!(customer.phone, None);
        assert_eq!(
            customer.last_visit,
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert!(customer.is_active());
    }

    #[test]
    fn test_customer_defaults() {
        let customer: Customer =
            serde_json::from_value(json!({"id": 2, "name": "Ana"})).unwrap();
        assert_eq!(customer.status, "active");
        assert_eq!(customer.total_spent, Decimal::ZERO);
        assert_eq!(customer.last_visit, None);
    }
}
