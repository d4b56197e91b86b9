//! Product payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, FieldKind, LanguageCode, LocalizedText, ProductId};
use crate::variants::{Variant, VariantSet};

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend ID.
    pub id: ProductId,
    /// Translated name and description (`name_en`, `description_ar`, ...).
    #[serde(flatten)]
    pub text: LocalizedText,
    /// Base SKU that variant SKUs are derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Current price, inherited by generated variants.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Product-level stock figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    /// Owning category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Variants currently stored for the product.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Whether shoppers must pick a variant.
    #[serde(default)]
    pub variants_required: bool,
    /// Whether the product is listed.
    #[serde(default = "listed")]
    pub is_active: bool,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

const fn listed() -> bool {
    true
}

impl Product {
    /// Name in `language`, falling back to any translation, then to the ID.
    #[must_use]
    pub fn display_name(&self, language: &LanguageCode) -> &str {
        self.text
            .resolve(FieldKind::Name, language)
            .unwrap_or_else(|| self.id.as_str())
    }

    /// The base SKU, or an empty string when none is set.
    #[must_use]
    pub fn base_sku(&self) -> &str {
        self.sku.as_deref().unwrap_or_default()
    }

    /// The stored variants as an editable set.
    #[must_use]
    pub fn variant_set(&self) -> VariantSet {
        VariantSet::from_variants(self.variants.clone())
    }
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Translated name and description.
    #[serde(flatten)]
    pub text: LocalizedText,
    /// Base SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Price.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Product-level stock figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    /// Owning category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Whether the product is listed.
    #[serde(default = "listed")]
    pub is_active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "p_1",
            "name_en": "Linen Shirt",
            "name_ar": "قميص كتان",
            "description_en": "Breathable summer shirt",
            "sku": "SHIRT",
            "price": 49.5,
            "stock": 40,
            "categoryId": "c_9",
            "variants": [
                { "name": "S", "sku": "SHIRT-S", "quantity": 4, "attributes": { "Size": "S" } }
            ],
            "variantsRequired": true,
            "createdAt": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn test_product_reads_flattened_translations() {
        let product: Product = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(product.display_name(&LanguageCode::arabic()), "قميص كتان");
        assert_eq!(product.price, Some(Decimal::new(495, 1)));
        assert_eq!(product.stock, Some(40));
        assert_eq!(product.base_sku(), "SHIRT");
        assert!(product.is_active);
        assert_eq!(product.variant_set().total_quantity(), 4);
    }

    #[test]
    fn test_product_writes_flattened_translations() {
        let product: Product = serde_json::from_value(sample_json()).unwrap();
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["name_en"], "Linen Shirt");
        assert_eq!(json["description_en"], "Breathable summer shirt");
        assert_eq!(json["categoryId"], "c_9");
        assert_eq!(json["variantsRequired"], true);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut product: Product = serde_json::from_value(sample_json()).unwrap();
        product.text = LocalizedText::new();
        assert_eq!(product.display_name(&LanguageCode::english()), "p_1");
        product.sku = None;
        assert_eq!(product.base_sku(), "");
    }

    #[test]
    fn test_new_product_payload() {
        let new = NewProduct {
            text: LocalizedText::new().with(FieldKind::Name, LanguageCode::english(), "Mug"),
            price: Some(Decimal::new(12, 0)),
            is_active: true,
            ..NewProduct::default()
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["name_en"], "Mug");
        assert_eq!(json["price"], serde_json::json!(12.0));
        assert!(json.get("sku").is_none());
    }
}
