//! Newtype IDs for type-safe identifiers.
//!
//! The backend hands out positive integer keys. Wrapping them keeps a
//! `ProductId` from being passed where a `CustomerId` is expected, and the
//! `NonZeroU64` inside makes an unassigned (zero) id unrepresentable.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::error::CommerceError;
use crate::normalize;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("Server-assigned ", $kind, " id.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Wrap a raw id. Returns `None` for zero.
            pub fn new(id: u64) -> Option<Self> {
                NonZeroU64::new(id).map(Self)
            }

            /// The raw integer value.
            pub fn get(&self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<NonZeroU64> for $name {
            fn from(id: NonZeroU64) -> Self {
                Self(id)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = CommerceError;

            fn try_from(id: u64) -> Result<Self, Self::Error> {
                Self::new(id).ok_or(CommerceError::InvalidId {
                    kind: $kind,
                    value: id,
                })
            }
        }

        impl FromStr for $name {
            type Err = CommerceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim().trim_start_matches('#');
                raw.parse::<u64>()
                    .map_err(|_| CommerceError::ValidationError(format!("not a {} id: {:?}", $kind, s)))
                    .and_then(Self::try_from)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw: u64 = normalize::count::deserialize(deserializer)?;
                Self::new(raw).ok_or_else(|| {
                    serde::de::Error::custom(concat!("invalid ", $kind, " id: 0"))
                })
            }
        }
    };
}

define_id!(ProductId, "product");
define_id!(CustomerId, "customer");
define_id!(StaffId, "staff");
define_id!(SupplierId, "supplier");
define_id!(SaleId, "sale");
define_id!(PaymentId, "payment");
