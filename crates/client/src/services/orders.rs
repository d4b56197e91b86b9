//! Order endpoints.

use merchant_admin_core::{ListQuery, Order, OrderId, OrderStatus, OrderStatusUpdate, Page};
use tracing::{info, instrument};

use super::{ListBody, segment};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;

impl ApiClient {
    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &ListQuery) -> Result<Page<Order>, ApiError> {
        let options = RequestOptions::new().with_query_params(query)?;
        let body: ListBody<Order> = self.get_with("orders", &options).await?;
        Ok(body.into())
    }

    /// Get a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` with status 404 if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get(&format!("orders/{}", segment(id.as_str()))).await
    }

    /// Move an order to a new fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails, including when the backend
    /// rejects the transition.
    #[instrument(skip(self, note), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, ApiError> {
        let order: Order = self
            .patch(
                &format!("orders/{}/status", segment(id.as_str())),
                &OrderStatusUpdate { status, note },
            )
            .await?;
        info!("Order status updated");
        Ok(order)
    }
}
