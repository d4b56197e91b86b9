//! Product options and variants.
//!
//! A product varies along up to [`MAX_OPTIONS`] named options (Size, Color, ...).
//! [`generate_variants`] expands the options into the full cartesian product of
//! concrete [`Variant`] records, and [`VariantSet`] holds the generated batch
//! while individual variants are repriced, restocked or removed.
//!
//! # Ordering
//!
//! Combinations are produced with the first option varying slowest and the last
//! option varying fastest:
//!
//! ```
//! use merchant_admin_core::{ProductOption, generate_variants};
//!
//! let options = [
//!     ProductOption::with_values("Size", ["S", "M"]).unwrap(),
//!     ProductOption::with_values("Color", ["Red", "Blue"]).unwrap(),
//! ];
//! let variants = generate_variants(&options, "SHIRT", None).unwrap();
//! let names: Vec<_> = variants.iter().map(|v| v.name.as_str()).collect();
//! assert_eq!(names, ["S / Red", "S / Blue", "M / Red", "M / Blue"]);
//! assert_eq!(variants[0].sku, "SHIRT-S-RED");
//! ```

mod editor;
mod generator;
mod option;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::VariantId;

pub use editor::{StockCheck, VariantSet};
pub use generator::{combinations, derive_sku, generate_variants};
pub use option::{OptionSet, ProductOption};

/// Maximum number of options a product may vary along.
pub const MAX_OPTIONS: usize = 4;

/// Separator between option values in a variant name.
pub const NAME_SEPARATOR: &str = " / ";

/// Errors raised by option editing, variant generation and variant editing.
///
/// Every operation that returns one of these leaves its target unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    /// Generation needs at least one option.
    #[error("at least one option is required")]
    NoOptions,

    /// More options than [`MAX_OPTIONS`].
    #[error("too many options: {count} (maximum is {max})")]
    TooManyOptions {
        /// Number of options supplied.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// An option name is blank.
    #[error("option name cannot be empty")]
    EmptyOptionName,

    /// Two options share a name.
    #[error("an option named \"{0}\" already exists")]
    DuplicateOptionName(String),

    /// An option has no values.
    #[error("option \"{0}\" has no values")]
    NoValues(String),

    /// A value is blank.
    #[error("option \"{0}\" cannot have an empty value")]
    EmptyValue(String),

    /// A value already exists in the option.
    #[error("option \"{option}\" already has the value \"{value}\"")]
    DuplicateValue {
        /// Option name.
        option: String,
        /// The rejected value.
        value: String,
    },

    /// Index-addressed edit outside the collection.
    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// Prices cannot go below zero.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// One concrete combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Backend ID, absent until the variant is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VariantId>,
    /// Option values joined with `" / "` in option order.
    pub name: String,
    /// Alternate display name, typically in the store's second language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_name: Option<String>,
    /// Stock keeping unit. Empty when the product has no base SKU.
    #[serde(default)]
    pub sku: String,
    /// Unit price. Inherited from the product at generation time.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
    /// Option name to chosen value, one entry per option.
    pub attributes: BTreeMap<String, String>,
    /// Whether the variant can be sold.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Payload replacing a product's variants on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsUpdate {
    /// The complete new variant set.
    pub variants: Vec<Variant>,
    /// Whether shoppers must pick a variant to buy the product.
    pub variants_required: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_wire_format_is_camel_case() {
        let variant = Variant {
            id: None,
            name: "S / Red".to_string(),
            secondary_name: Some("صغير / أحمر".to_string()),
            sku: "SHIRT-S-RED".to_string(),
            price: Some(Decimal::new(1950, 2)),
            quantity: 3,
            attributes: BTreeMap::from([
                ("Size".to_string(), "S".to_string()),
                ("Color".to_string(), "Red".to_string()),
            ]),
            is_active: true,
        };

        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["secondaryName"], "صغير / أحمر");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["price"], serde_json::json!(19.5));
        assert_eq!(json["attributes"]["Color"], "Red");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_variant_defaults_when_fields_missing() {
        let variant: Variant = serde_json::from_value(serde_json::json!({
            "name": "M",
            "attributes": { "Size": "M" }
        }))
        .unwrap();

        assert!(variant.is_active);
        assert_eq!(variant.quantity, 0);
        assert_eq!(variant.sku, "");
        assert_eq!(variant.price, None);
    }

    #[test]
    fn test_variants_update_payload_keys() {
        let update = VariantsUpdate {
            variants: Vec::new(),
            variants_required: false,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["variantsRequired"], false);
        assert!(json["variants"].as_array().unwrap().is_empty());
    }
}
