//! Staff records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::StaffId;
use crate::normalize;
use crate::resource::Entity;

/// What a staff member does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Manager,
    #[default]
    Cashier,
    Inventory,
    Accountant,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Manager => "manager",
            StaffRole::Cashier => "cashier",
            StaffRole::Inventory => "inventory",
            StaffRole::Accountant => "accountant",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStatus::Active => "active",
            StaffStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default, deserialize_with = "normalize::blank_as_none", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Staff {
    type Id = StaffId;
    type Create = StaffCreate;
    type Update = StaffUpdate;

    const PATH: &'static str = "/staff/";
    const PLURAL: &'static str = "staff";

    fn id(&self) -> StaffId {
        self.id
    }
}

/// Body for `POST /staff/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffCreate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: StaffRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub status: StaffStatus,
}

/// Partial body for `PUT /staff/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaffUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StaffStatus>,
}
