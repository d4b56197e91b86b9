//! Thin wrappers over the merchant resource endpoints.
//!
//! Every method goes through [`ApiClient::call`](crate::ApiClient::call), so
//! bearer injection and session recovery apply uniformly.

mod categories;
mod orders;
mod products;
mod settings;

use merchant_admin_core::Page;
use serde::Deserialize;

/// List responses arrive either as a page envelope or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page(Page<T>),
    Bare(Vec<T>),
}

impl<T> From<ListBody<T>> for Page<T> {
    fn from(body: ListBody<T>) -> Self {
        match body {
            ListBody::Page(page) => page,
            ListBody::Bare(items) => Self {
                total: u64::try_from(items.len()).ok(),
                items,
                page: None,
                limit: None,
            },
        }
    }
}

/// Percent-encode one path segment.
fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_body_accepts_both_shapes() {
        let bare: ListBody<u32> = serde_json::from_str("[1,2,3]").unwrap();
        let page = Page::from(bare);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, Some(3));

        let envelope: ListBody<u32> =
            serde_json::from_str(r#"{"data":[4],"total":9,"page":2,"limit":1}"#).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.items, vec![4]);
        assert!(page.has_more());
    }

    #[test]
    fn test_segment_encodes_separators() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
    }
}
