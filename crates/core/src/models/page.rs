//! List envelope and list query parameters.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(alias = "data")]
    pub items: Vec<T>,
    /// Total number of items across all pages, when the backend reports it.
    #[serde(default)]
    pub total: Option<u64>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> Page<T> {
    /// Whether more pages follow this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        match (self.total, self.page, self.limit) {
            (Some(total), Some(page), Some(limit)) => u64::from(page) * u64::from(limit) < total,
            _ => false,
        }
    }
}

/// Common query parameters of list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status filter, for endpoints that support one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_accepts_data_alias() {
        let page: Page<u32> =
            serde_json::from_value(serde_json::json!({ "data": [1, 2], "total": 5, "page": 1, "limit": 2 }))
                .unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more());
    }

    #[test]
    fn test_last_page_has_no_more() {
        let page: Page<u32> =
            serde_json::from_value(serde_json::json!({ "items": [5], "total": 5, "page": 3, "limit": 2 }))
                .unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_list_query_skips_unset_fields() {
        let query = ListQuery {
            limit: Some(20),
            ..ListQuery::default()
        };
        assert_eq!(serde_json::to_value(&query).unwrap(), serde_json::json!({ "limit": 20 }));
    }
}
