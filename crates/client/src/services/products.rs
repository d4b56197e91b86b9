//! Product endpoints.

use merchant_admin_core::{
    ListQuery, NewProduct, Page, Product, ProductId, VariantSet, VariantsUpdate,
};
use tracing::{info, instrument};

use super::{ListBody, segment};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;

impl ApiClient {
    /// List products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ListQuery) -> Result<Page<Product>, ApiError> {
        let options = RequestOptions::new().with_query_params(query)?;
        let body: ListBody<Product> = self.get_with("products", &options).await?;
        Ok(body.into())
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get(&format!("products/{}", segment(id.as_str()))).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, product))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let created: Product = self.post("products", product).await?;
        info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Update a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        self.put(&format!("products/{}", segment(id.as_str())), product)
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.delete(&format!("products/{}", segment(id.as_str())))
            .await?;
        info!("Product deleted");
        Ok(())
    }

    /// Replace every variant of a product.
    ///
    /// The backend treats the payload as the complete new set.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update), fields(product_id = %id, variants = update.variants.len()))]
    pub async fn replace_variants(
        &self,
        id: &ProductId,
        update: &VariantsUpdate,
    ) -> Result<Product, ApiError> {
        let product: Product = self
            .put(&format!("products/{}", segment(id.as_str())), update)
            .await?;
        info!(stored = product.variants.len(), "Variants replaced");
        Ok(product)
    }

    /// Save an edited variant set.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn save_variants(
        &self,
        id: &ProductId,
        variants: &VariantSet,
        variants_required: bool,
    ) -> Result<Product, ApiError> {
        self.replace_variants(id, &variants.to_update(variants_required))
            .await
    }
}
