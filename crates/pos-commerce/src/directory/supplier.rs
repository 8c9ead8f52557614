//! Supplier records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::SupplierId;
use crate::normalize;
use crate::resource::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupplierStatus::Active => "active",
            SupplierStatus::Pending => "pending",
            SupplierStatus::Inactive => "inactive",
        })
    }
}

/// A supplier of stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    pub email: String,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub status: SupplierStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Supplier {
    type Id = SupplierId;
    type Create = SupplierCreate;
    type Update = SupplierUpdate;

    const PATH: &'static str = "/suppliers/";
    const PLURAL: &'static str = "suppliers";

    fn id(&self) -> SupplierId {
        self.id
    }
}

/// Body for `POST /suppliers/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierCreate {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: SupplierStatus,
}

/// Partial body for `PUT /suppliers/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SupplierStatus>,
}
