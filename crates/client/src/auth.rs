//! Session management against the `/auth` endpoints.
//!
//! Handles email/password login, access token refresh and logout. Tokens
//! obtained here go straight into the client's [`TokenStore`].
//!
//! [`TokenStore`]: crate::storage::TokenStore

use merchant_admin_core::Email;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use crate::client::{ApiClient, RequestOptions};
use crate::error::{ApiError, extract_message};
use crate::refresh::RefreshFailure;
use crate::storage::{TokenKey, TokenStore};

const LOGIN_PATH: &str = "auth/login";
const REFRESH_PATH: &str = "auth/refresh";
const LOGOUT_PATH: &str = "auth/logout";

/// Request body for `/auth/login`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Tokens returned by `/auth/login`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

/// Request body for `/auth/refresh`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Tokens returned by `/auth/refresh`. The refresh token is only present
/// when the backend rotates it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange a refresh token for new tokens.
///
/// Sent without a bearer credential and outside the 401 recovery path.
#[instrument(skip(http, refresh_token))]
async fn request_refresh(
    http: &reqwest::Client,
    url: Url,
    timeout: std::time::Duration,
    refresh_token: &SecretString,
) -> Result<RefreshResponse, RefreshFailure> {
    let response = http
        .post(url)
        .timeout(timeout)
        .json(&RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        })
        .send()
        .await
        .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(RefreshFailure::Rejected {
            status: status.as_u16(),
            message: extract_message(&body)
                .unwrap_or_else(|| "Token refresh failed".to_string()),
        });
    }

    serde_json::from_slice(&body).map_err(|e| RefreshFailure::Rejected {
        status: status.as_u16(),
        message: format!("Invalid refresh response: {e}"),
    })
}

impl ApiClient {
    /// Log in with email and password, storing both tokens.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` with status 401 for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<(), ApiError> {
        let body = serde_json::to_value(LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        })?;
        let tokens: LoginResponse = self
            .call_once(Method::POST, LOGIN_PATH, Some(&body), &RequestOptions::default())
            .await?
            .json()?;

        let store = &self.inner.store;
        store.set(TokenKey::AccessToken, SecretString::from(tokens.access_token))?;
        store.set(TokenKey::RefreshToken, SecretString::from(tokens.refresh_token))?;

        info!("Logged in");
        Ok(())
    }

    /// End the session.
    ///
    /// The backend is notified on a best-effort basis; its failure is logged
    /// and the local tokens are cleared regardless.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` only if the local tokens cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.is_authenticated()? {
            let result = self
                .call_once(Method::POST, LOGOUT_PATH, None, &RequestOptions::default())
                .await;
            if let Err(e) = result {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }

        self.inner.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Whether an access token is stored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the token store cannot be read.
    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.inner.store.get(TokenKey::AccessToken)?.is_some())
    }

    /// Whether either token is stored, i.e. a call could still be
    /// authenticated after a refresh.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the token store cannot be read.
    pub fn has_session(&self) -> Result<bool, ApiError> {
        let store = &self.inner.store;
        Ok(store.get(TokenKey::AccessToken)?.is_some()
            || store.get(TokenKey::RefreshToken)?.is_some())
    }

    /// Obtain a new access token, sharing any refresh already in flight.
    ///
    /// `stale` is the access token that was rejected. If the store already
    /// holds a different one, it is returned without a network call.
    ///
    /// On failure both stored tokens are cleared; the session is over.
    ///
    /// # Errors
    ///
    /// Returns the `RefreshFailure` every concurrent caller receives.
    pub async fn refresh_session(
        &self,
        stale: Option<&SecretString>,
    ) -> Result<SecretString, RefreshFailure> {
        self.inner
            .refresh
            .run(|| async move {
                let store = self.inner.store.as_ref();

                let current = store
                    .get(TokenKey::AccessToken)
                    .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
                if let (Some(stale), Some(current)) = (stale, current.as_ref())
                    && stale.expose_secret() != current.expose_secret()
                {
                    return Ok(current.clone());
                }

                let result = self.perform_refresh(store).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Token refresh failed, ending session");
                    if let Err(e) = store.clear() {
                        warn!(error = %e, "Failed to clear session tokens");
                    }
                }
                result
            })
            .await
    }

    #[instrument(skip_all)]
    async fn perform_refresh(&self, store: &dyn TokenStore) -> Result<SecretString, RefreshFailure> {
        let refresh_token = store
            .get(TokenKey::RefreshToken)
            .map_err(|e| RefreshFailure::Storage(e.to_string()))?
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        let url = self
            .endpoint(REFRESH_PATH)
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;
        let tokens = request_refresh(&self.inner.http, url, self.inner.timeout, &refresh_token)
            .await?;

        let access_token = SecretString::from(tokens.access_token);
        store
            .set(TokenKey::AccessToken, access_token.clone())
            .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
        if let Some(refresh_token) = tokens.refresh_token {
            store
                .set(TokenKey::RefreshToken, SecretString::from(refresh_token))
                .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
        }

        info!("Access token refreshed");
        Ok(access_token)
    }
}
