//! Numeric coercion for backend payloads.
//!
//! Decimal columns arrive as JSON strings (`"19.99"`), aggregates arrive as
//! numbers, and some counters arrive as either. Every numeric field on the
//! domain types goes through one of these modules so callers only ever see
//! real numbers.
//!
//! ```rust,ignore
//! #[derive(Deserialize)]
//! struct Row {
//!     #[serde(with = "normalize::decimal")]
//!     price: Decimal,
//!     #[serde(with = "normalize::count")]
//!     stock: u32,
//! }
//! ```

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A JSON value that should be a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    /// `Ok(None)` for blank text.
    fn into_decimal(self) -> Result<Option<Decimal>, String> {
        match self {
            Numeric::Int(n) => Ok(Some(Decimal::from(n))),
            Numeric::Float(f) => Decimal::from_str(&f.to_string())
                .map(Some)
                .map_err(|e| format!("invalid number {}: {}", f, e)),
            Numeric::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map(Some)
                    .map_err(|_| format!("invalid number: {:?}", s))
            }
        }
    }
}

fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Numeric::deserialize(deserializer)?
        .into_decimal()
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("expected a number, got empty text"))
}

fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(raw) => raw.into_decimal().map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// Whole non-negative value of `value`. Negative counts clamp to zero.
fn whole<T: TryFrom<u64>>(value: Decimal) -> Result<T, String> {
    if !value.fract().is_zero() {
        return Err(format!("expected a whole number, got {}", value));
    }
    if value.is_sign_negative() {
        return T::try_from(0).map_err(|_| "count out of range".to_string());
    }
    value
        .to_u64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| format!("count out of range: {}", value))
}

fn to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Exact decimal, written back as a JSON number.
pub mod decimal {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_f64(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        required(deserializer)
    }
}

/// Optional exact decimal. `null` and blank text become `None`.
pub mod opt_decimal {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&to_f64(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        optional(deserializer)
    }
}

/// Non-negative whole number (stock, quantities, tallies).
pub mod count {
    use super::*;
    use serde::{Serialize, Serializer};

    pub fn serialize<S: Serializer, T: Serialize>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        whole(required(deserializer)?).map_err(D::Error::custom)
    }
}

/// Optional non-negative whole number.
pub mod opt_count {
    use super::*;
    use serde::{Serialize, Serializer};

    pub fn serialize<S: Serializer, T: Serialize>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        optional(deserializer)?
            .map(whole)
            .transpose()
            .map_err(D::Error::custom)
    }
}

/// Floating point ratio (success rates, timings). Blank or null is zero.
pub mod float {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(optional(deserializer)?.map(|d| to_f64(&d)).unwrap_or_default())
    }
}

/// Deserialize text that may be `null`, missing or blank into `Option<T>`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(with = "decimal")]
        price: Decimal,
        #[serde(with = "count")]
        stock: u32,
        #[serde(default, with = "opt_count")]
        min_stock: Option<u32>,
        #[serde(default, with = "opt_decimal")]
        discount: Option<Decimal>,
        #[serde(default, with = "float")]
        rate: f64,
        #[serde(default, deserialize_with = "blank_as_none")]
        sku: Option<String>,
    }

    #[test]
    fn test_text_numbers_become_numbers() {
        let row: Row = serde_json::from_value(json!({
            "price": "19.99",
            "stock": "5",
            "min_stock": "2",
            "discount": "1.50",
            "rate": "98.5",
            "sku": "RICE-5KG"
        }))
        .unwrap();

        assert_eq!(row.price, dec!(19.99));
        assert_eq!(row.stock, 5);
        assert_eq!(row.min_stock, Some(2));
        assert_eq!(row.discount, Some(dec!(1.50)));
        assert!((row.rate - 98.5).abs() < f64::EPSILON);
        assert_eq!(row.sku.as_deref(), Some("RICE-5KG"));
    }

    #[test]
    fn test_native_numbers_pass_through() {
        let row: Row = serde_json::from_value(json!({
            "price": 19.99,
            "stock": 5.0,
            "rate": 1
        }))
        .unwrap();

        assert_eq!(row.price, dec!(19.99));
        assert_eq!(row.stock, 5);
        assert_eq!(row.min_stock, None);
        assert_eq!(row.discount, None);
        assert_eq!(row.sku, None);
    }

    #[test]
    fn test_blank_and_null_optionals() {
        let row: Row = serde_json::from_value(json!({
            "price": "0",
            "stock": 0,
            "min_stock": null,
            "discount": "",
            "sku": "  "
        }))
        .unwrap();

        assert_eq!(row.min_stock, None);
        assert_eq!(row.discount, None);
        assert_eq!(row.sku, None);
        assert_eq!(row.rate, 0.0);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(serde_json::from_value::<Row>(json!({"price": "abc", "stock": 1})).is_err());
        assert!(serde_json::from_value::<Row>(json!({"price": "", "stock": 1})).is_err());
        assert!(serde_json::from_value::<Row>(json!({"price": 1, "stock": 1.5})).is_err());
    }

    #[test]
    fn test_negative_count_clamps_to_zero() {
        let row: Row = serde_json::from_value(json!({"price": 1, "stock": -3})).unwrap();
        assert_eq!(row.stock, 0);
    }

    #[test]
    fn test_decimal_serializes_as_json_number() {
        let row = Row {
            price: dec!(19.99),
            stock: 3,
            min_stock: None,
            discount: Some(dec!(2.5)),
            rate: 0.0,
            sku: None,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["price"], json!(19.99));
        assert_eq!(value["stock"], json!(3));
        assert_eq!(value["discount"], json!(2.5));
        assert_eq!(value["min_stock"], json!(null));
    }
}
