//! Category payloads.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, LocalizedText};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Backend ID.
    pub id: CategoryId,
    /// Translated name.
    #[serde(flatten)]
    pub text: LocalizedText,
    /// Parent category for nested catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    /// Whether the category is shown in the store.
    #[serde(default)]
    pub is_active: bool,
}

/// Fields for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    /// Translated name.
    #[serde(flatten)]
    pub text: LocalizedText,
    /// Parent category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}
