//! Category endpoints.

use merchant_admin_core::{Category, CategoryId, NewCategory, Page};
use tracing::instrument;

use super::{ListBody, segment};
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Page<Category>, ApiError> {
        let body: ListBody<Category> = self.get("categories").await?;
        Ok(body.into())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, category))]
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.post("categories", category).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("categories/{}", segment(id.as_str())))
            .await
    }
}
