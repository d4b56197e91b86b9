//! Store and payment settings endpoints.

use merchant_admin_core::{PaymentSettings, StoreSettings};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Get the store profile.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn store_settings(&self) -> Result<StoreSettings, ApiError> {
        self.get("settings/store").await
    }

    /// Replace the store profile.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn update_store_settings(
        &self,
        settings: &StoreSettings,
    ) -> Result<StoreSettings, ApiError> {
        self.put("settings/store", settings).await
    }

    /// Get the enabled payment methods.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn payment_settings(&self) -> Result<PaymentSettings, ApiError> {
        self.get("settings/payment").await
    }

    /// Replace the payment configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn update_payment_settings(
        &self,
        settings: &PaymentSettings,
    ) -> Result<PaymentSettings, ApiError> {
        self.put("settings/payment", settings).await
    }
}
