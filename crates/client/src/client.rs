//! Merchant API client with transparent session recovery.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{Instrument, debug, debug_span, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::refresh::{RefreshCoordinator, RefreshFailure};
use crate::storage::{TokenKey, TokenStore};

/// Header carrying a per-attempt correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const USER_AGENT: &str = concat!("merchant-admin/", env!("CARGO_PKG_VERSION"));

/// Merchant REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the token store
/// and the refresh coordinator, so concurrent 401s across clones still
/// produce a single refresh.
///
/// # Authentication
///
/// The stored access token is attached to every request. On a 401 the
/// request waits for (or performs) one refresh and is replayed once with the
/// new token. A replay that is rejected again fails without another refresh.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ApiClientInner>,
}

pub(crate) struct ApiClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) store: Arc<dyn TokenStore>,
    pub(crate) refresh: RefreshCoordinator,
    pub(crate) timeout: Duration,
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options with nothing overridden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append every non-null field of a serializable struct as query
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if `params` does not serialize to a JSON
    /// object.
    pub fn with_query_params<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params)?;
        let serde_json::Value::Object(fields) = value else {
            return Err(ApiError::Decode(serde::de::Error::custom(
                "query parameters must be an object",
            )));
        };
        for (key, value) in fields {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => self.query.push((key, s)),
                other => self.query.push((key, other.to_string())),
            }
        }
        Ok(self)
    }

    /// Override the configured timeout for this call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A raw API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON. An empty body decodes as `null`, so `()` and
    /// `Option<T>` accept bodiless responses.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn into_result(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                store,
                refresh: RefreshCoordinator::new(),
                timeout: config.timeout,
            }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Request pipeline
    // =========================================================================

    /// Send a request, recovering once from an expired access token.
    ///
    /// # Errors
    ///
    /// - `ApiError::Http` for any non-success status, including a 401 on the
    ///   replayed request
    /// - `ApiError::Network` if no response arrived (timeouts included)
    /// - `ApiError::AuthRefresh` if the session could not be refreshed; both
    ///   stored tokens have been cleared by then
    #[instrument(skip(self, body, options), fields(method = %method))]
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let sent_with = self.inner.store.get(TokenKey::AccessToken)?;

        let response = self
            .send(&method, &url, body, options, sent_with.as_ref())
            .await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return response.into_result();
        }

        let Some(token) = self.recover(sent_with.as_ref()).await? else {
            return response.into_result();
        };

        debug!("Replaying request with refreshed token");
        let replay = self
            .send(&method, &url, body, options, Some(&token))
            .await?;
        if replay.status == StatusCode::UNAUTHORIZED {
            warn!("Request rejected again after token refresh");
        }
        replay.into_result()
    }

    /// Send a request once, without session recovery.
    ///
    /// Used by the auth endpoints, where a 401 means bad credentials rather
    /// than an expired token.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`], minus `AuthRefresh`.
    pub async fn call_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let token = self.inner.store.get(TokenKey::AccessToken)?;
        self.send(&method, &url, body, options, token.as_ref())
            .await?
            .into_result()
    }

    /// Decide which token a request rejected with 401 should be replayed with.
    ///
    /// `None` means there is no session to recover and the 401 stands.
    async fn recover(
        &self,
        sent_with: Option<&SecretString>,
    ) -> Result<Option<SecretString>, ApiError> {
        let current = self.inner.store.get(TokenKey::AccessToken)?;

        match (sent_with, current) {
            // A refresh finished while this request was in flight.
            (Some(sent), Some(current)) if sent.expose_secret() != current.expose_secret() => {
                return Ok(Some(current));
            }
            (None, Some(current)) => return Ok(Some(current)),
            (Some(_), None) => return Err(RefreshFailure::SessionEnded.into()),
            (None, None) if self.inner.store.get(TokenKey::RefreshToken)?.is_none() => {
                return Ok(None);
            }
            _ => {}
        }

        Ok(Some(self.refresh_session(sent_with).await?))
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&serde_json::Value>,
        options: &RequestOptions,
        token: Option<&SecretString>,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = Uuid::new_v4();
        let span = debug_span!("http", %request_id, path = url.path());

        async {
            let mut request = self
                .inner
                .http
                .request(method.clone(), url.clone())
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .timeout(options.timeout.unwrap_or(self.inner.timeout));
            if !options.query.is_empty() {
                request = request.query(&options.query);
            }
            if let Some(token) = token {
                request = request.bearer_auth(token.expose_secret());
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            debug!(status = status.as_u16(), bytes = body.len(), "API response");

            Ok(ApiResponse { status, body })
        }
        .instrument(span)
        .await
    }

    /// Resolve an endpoint path beneath the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let invalid = |reason: &str| ApiError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.contains("://") {
            return Err(invalid("absolute URLs are not allowed"));
        }
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| invalid(&e.to_string()))?;
        if !url.as_str().starts_with(self.inner.base_url.as_str()) {
            return Err(invalid("path escapes the API base URL"));
        }
        Ok(url)
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`]; also `ApiError::Decode` on a shape mismatch.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with(path, &RequestOptions::default()).await
    }

    /// GET a JSON resource with per-call options.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.call(Method::GET, path, None, options).await?.json()
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(Method::POST, path, body).await
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(Method::PUT, path, body).await
    }

    /// PATCH a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(Method::PATCH, path, body).await
    }

    /// DELETE a resource.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(Method::DELETE, path, None, &RequestOptions::default())
            .await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.call(method, path, Some(&body), &RequestOptions::default())
            .await?
            .json()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}
