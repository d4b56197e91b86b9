//! Order payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, OrderId, OrderStatus, PaymentStatus, Price, ProductId};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend ID.
    pub id: OrderId,
    /// Human-facing order number.
    pub order_number: String,
    /// Fulfillment status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Payment status.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Currency of all amounts on the order, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    /// Customer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Line items.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Placement time.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The total with its currency, if the currency is known.
    #[must_use]
    pub fn total_price(&self) -> Option<Price> {
        self.currency
            .clone()
            .map(|currency| Price::new(self.total, currency))
    }

    /// The total for display; the bare amount when no currency is reported.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        self.total_price()
            .map_or_else(|| format!("{:.2}", self.total), |price| price.to_string())
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Ordered product.
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Variant name (`"S / Red"`), if a variant was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    /// Units ordered.
    pub quantity: u32,
    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Body of an order status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    /// New status.
    pub status: OrderStatus,
    /// Optional note shown in the order history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_and_totals() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o_1",
            "orderNumber": "1001",
            "status": "processing",
            "paymentStatus": "paid",
            "total": 74.5,
            "currency": "SAR",
            "items": [
                { "productId": "p_1", "name": "Shirt", "variantName": "S / Red", "quantity": 2, "unitPrice": 25.0 },
                { "productId": "p_2", "name": "Cap", "quantity": 1, "unitPrice": 24.5 }
            ],
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.unit_count(), 3);
        assert_eq!(order.formatted_total(), "74.50 SAR");
    }

    fn order_with_currency(currency: Option<&str>) -> Order {
        let mut json = serde_json::json!({
            "id": "o_2",
            "orderNumber": "1002",
            "total": 12,
            "createdAt": "2024-05-01T10:00:00Z"
        });
        if let Some(currency) = currency {
            json["currency"] = serde_json::json!(currency);
        }
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_missing_currency_stays_unknown() {
        let order = order_with_currency(None);
        assert_eq!(order.currency, None);
        assert_eq!(order.total_price(), None);
        assert_eq!(order.formatted_total(), "12.00");
        assert!(serde_json::to_value(&order).unwrap().get("currency").is_none());
    }

    #[test]
    fn test_lowercase_and_unlisted_currencies_decode() {
        assert_eq!(order_with_currency(Some("sar")).currency, Some(CurrencyCode::SAR));

        let order = order_with_currency(Some("QAR"));
        assert_eq!(order.currency, Some(CurrencyCode::Other("QAR".to_string())));
        assert_eq!(order.formatted_total(), "12.00 QAR");
    }

    #[test]
    fn test_status_update_body() {
        let body = OrderStatusUpdate {
            status: OrderStatus::Shipped,
            note: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "status": "shipped" })
        );
    }
}
