//! Payment methods, statuses and payment records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::directory::Customer;
use crate::error::CommerceError;
use crate::ids::{CustomerId, PaymentId};
use crate::normalize;
use crate::resource::{Entity, Related};

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Mobile => "mobile",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Mobile => "Mobile Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "mobile" => Ok(PaymentMethod::Mobile),
            _ => Err(CommerceError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Settlement state of a sale or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further payment processing is possible.
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer foreign key as sent by the server.
pub type CustomerRef = Related<CustomerId, Customer>;

/// A payment record. The server embeds the full customer on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub transaction_id: String,
    pub order_id: String,
    pub customer: CustomerRef,
    #[serde(with = "normalize::decimal")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
}

impl Payment {
    /// Customer name when embedded, otherwise the id.
    pub fn customer_label(&self) -> String {
        match &self.customer {
            Related::Embedded(customer) => customer.name.clone(),
            Related::Reference(id) => format!("#{}", id),
        }
    }
}

impl Entity for Payment {
    type Id = PaymentId;
    type Create = PaymentCreate;
    type Update = PaymentUpdate;

    const PATH: &'static str = "/payments/";
    const PLURAL: &'static str = "payments";

    fn id(&self) -> PaymentId {
        self.id
    }
}

/// Body for `POST /payments/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentCreate {
    pub transaction_id: String,
    pub order_id: String,
    pub customer: CustomerId,
    #[serde(with = "normalize::decimal")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

/// Partial body for `PUT /payments/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
}
