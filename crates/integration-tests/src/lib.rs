//! Integration test harness for the merchant admin client.
//!
//! [`MockBackend`] serves a scripted subset of the merchant REST API on an
//! ephemeral local port so the real `reqwest`-based client can be driven
//! end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p merchant-admin-integration-tests
//! ```
//!
//! # Scripted Session
//!
//! The backend accepts exactly one access token at a time (initially
//! [`ACCESS_FRESH`]). Clients seeded with [`ACCESS_EXPIRED`] get a 401 and
//! must refresh with [`REFRESH_INITIAL`], which yields [`ACCESS_FRESH`] and
//! [`REFRESH_ROTATED`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use merchant_admin_client::{ApiClient, ClientConfig, MemoryTokenStore, TokenStore};
use serde_json::{Value, json};

/// Access token the client starts with; always rejected.
pub const ACCESS_EXPIRED: &str = "access-1";
/// Refresh token the client starts with.
pub const REFRESH_INITIAL: &str = "refresh-1";
/// Access token issued by login and refresh.
pub const ACCESS_FRESH: &str = "access-2";
/// Refresh token issued by login and a rotating refresh.
pub const REFRESH_ROTATED: &str = "refresh-2";
/// The only password `/auth/login` accepts.
pub const PASSWORD: &str = "correct-horse";

/// How long `/slow-401` holds a request before checking its token.
pub const SLOW_AUTH_DELAY: Duration = Duration::from_millis(300);

/// How `/auth/refresh` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// New access and refresh tokens.
    #[default]
    Rotate,
    /// New access token only.
    AccessOnly,
    /// 401 for every refresh token.
    Reject,
}

/// Observable backend state.
#[derive(Default)]
pub struct BackendState {
    refresh_mode: Mutex<RefreshMode>,
    refresh_delay: Mutex<Duration>,
    products: Mutex<HashMap<String, Value>>,
    request_ids: Mutex<Vec<String>>,
    last_query: Mutex<HashMap<String, String>>,
    saw_authorization: Mutex<Vec<bool>>,
    /// Calls to `/auth/refresh`.
    pub refresh_calls: AtomicUsize,
    /// Calls to `/always-401`.
    pub rejected_calls: AtomicUsize,
    /// Calls to `/auth/logout`.
    pub logout_calls: AtomicUsize,
    /// Calls to `PUT /products/{id}`.
    pub product_writes: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BackendState {
    /// Number of `/auth/refresh` calls so far.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Every `x-request-id` received so far.
    #[must_use]
    pub fn request_ids(&self) -> Vec<String> {
        lock(&self.request_ids).clone()
    }

    /// Query parameters of the last list request.
    #[must_use]
    pub fn last_query(&self) -> HashMap<String, String> {
        lock(&self.last_query).clone()
    }

    /// For each `/public` call, whether it carried an `Authorization` header.
    #[must_use]
    pub fn public_authorization(&self) -> Vec<bool> {
        lock(&self.saw_authorization).clone()
    }

    /// The stored product JSON.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<Value> {
        lock(&self.products).get(id).cloned()
    }
}

/// A running mock backend.
pub struct MockBackend {
    /// Base URL, e.g. `http://127.0.0.1:41234/api`.
    pub base_url: String,
    /// Shared state for assertions.
    pub state: Arc<BackendState>,
}

impl MockBackend {
    /// Start a backend holding one product, `p1` ("Linen Shirt", SKU
    /// `SHIRT`, price 20, stock 10).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if no local port can be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let state = Arc::new(BackendState::default());
        lock(&state.products).insert("p1".to_string(), sample_product());

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/logout", post(logout))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product).put(put_product))
            .route("/orders", get(list_orders))
            .route("/orders/{id}/status", patch(update_order_status))
            .route("/settings/payment", get(payment_settings))
            .route("/public", get(public))
            .route("/forbidden", get(forbidden))
            .route("/boom", get(boom))
            .route("/slow", get(slow))
            .route("/always-401", get(always_unauthorized))
            .route("/slow-401", get(slow_authorized))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            state,
        })
    }

    /// Set how `/auth/refresh` answers.
    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *lock(&self.state.refresh_mode) = mode;
    }

    /// Delay every `/auth/refresh` response.
    pub fn set_refresh_delay(&self, delay: Duration) {
        *lock(&self.state.refresh_delay) = delay;
    }

    /// A client for this backend over `store`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, store: Arc<dyn TokenStore>) -> ApiClient {
        let config = ClientConfig::new(&self.base_url).expect("mock backend URL is valid");
        ApiClient::new(&config, store).expect("Failed to create HTTP client")
    }

    /// A store holding the expired access token and the initial refresh token.
    #[must_use]
    pub fn expired_session() -> Arc<MemoryTokenStore> {
        Arc::new(MemoryTokenStore::with_session(ACCESS_EXPIRED, REFRESH_INITIAL))
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "statusCode": status.as_u16() }))).into_response()
}

fn record_request_id(state: &BackendState, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        lock(&state.request_ids).push(id.to_string());
    }
}

/// Record the request and check its bearer token.
fn authorized(state: &BackendState, headers: &HeaderMap) -> bool {
    record_request_id(state, headers);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_FRESH}"))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD && body["email"].is_string() {
        Json(json!({ "accessToken": ACCESS_FRESH, "refreshToken": REFRESH_ROTATED }))
            .into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn refresh(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *lock(&state.refresh_delay);
    tokio::time::sleep(delay).await;

    let mode = *lock(&state.refresh_mode);
    let known = body["refreshToken"] == REFRESH_INITIAL || body["refreshToken"] == REFRESH_ROTATED;
    match mode {
        RefreshMode::Reject => error(StatusCode::UNAUTHORIZED, "Refresh token expired"),
        _ if !known => error(StatusCode::UNAUTHORIZED, "Unknown refresh token"),
        RefreshMode::Rotate => {
            Json(json!({ "accessToken": ACCESS_FRESH, "refreshToken": REFRESH_ROTATED }))
                .into_response()
        }
        RefreshMode::AccessOnly => Json(json!({ "accessToken": ACCESS_FRESH })).into_response(),
    }
}

async fn logout(State(state): State<Arc<BackendState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    error(StatusCode::INTERNAL_SERVER_ERROR, "logout unavailable")
}

async fn list_products(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    *lock(&state.last_query) = query;
    let items: Vec<Value> = lock(&state.products).values().cloned().collect();
    let total = items.len();
    Json(json!({ "data": items, "total": total, "page": 1, "limit": 20 })).into_response()
}

async fn get_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    match lock(&state.products).get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn put_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    state.product_writes.fetch_add(1, Ordering::SeqCst);

    let mut products = lock(&state.products);
    let Some(Value::Object(product)) = products.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if let Value::Object(fields) = body {
        for (key, value) in fields {
            product.insert(key, value);
        }
    }
    Json(Value::Object(product.clone())).into_response()
}

async fn list_orders(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let status = query.get("status").cloned().unwrap_or_else(|| "pending".into());
    *lock(&state.last_query) = query;
    Json(json!([sample_order("o1", &status)])).into_response()
}

async fn update_order_status(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    match body["status"].as_str() {
        Some(status) => Json(sample_order(&id, status)).into_response(),
        None => error(StatusCode::BAD_REQUEST, "status is required"),
    }
}

async fn payment_settings(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(json!({
        "cashOnDelivery": true,
        "onlinePayment": false,
        "bankTransfer": true,
        "bankDetails": { "bankName": "Al Rajhi", "accountName": "Shop LLC", "iban": "SA0380000000608010167519" }
    }))
    .into_response()
}

async fn public(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    record_request_id(&state, &headers);
    lock(&state.saw_authorization).push(headers.contains_key(header::AUTHORIZATION));
    Json(json!({ "ok": true })).into_response()
}

async fn forbidden(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    record_request_id(&state, &headers);
    error(StatusCode::FORBIDDEN, "Forbidden resource")
}

async fn boom(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    record_request_id(&state, &headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "stack trace").into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "ok": true })).into_response()
}

/// Checks the bearer token only after a delay, so a refresh can complete
/// while the request is in flight.
async fn slow_authorized(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    tokio::time::sleep(SLOW_AUTH_DELAY).await;
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(json!({ "ok": true })).into_response()
}

async fn always_unauthorized(State(state): State<Arc<BackendState>>) -> Response {
    state.rejected_calls.fetch_add(1, Ordering::SeqCst);
    error(StatusCode::UNAUTHORIZED, "Unauthorized")
}

// =============================================================================
// Fixtures
// =============================================================================

fn sample_product() -> Value {
    json!({
        "id": "p1",
        "name_en": "Linen Shirt",
        "name_ar": "قميص كتان",
        "sku": "SHIRT",
        "price": 20.0,
        "stock": 10,
        "variants": [],
        "variantsRequired": false,
        "isActive": true
    })
}

fn sample_order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "orderNumber": "1001",
        "status": status,
        "paymentStatus": "paid",
        "total": 40.0,
        "currency": "SAR",
        "customerName": "Layla",
        "items": [
            { "productId": "p1", "name": "Linen Shirt", "variantName": "M / Blue", "quantity": 2, "unitPrice": 20.0 }
        ],
        "createdAt": "2026-01-05T10:00:00Z"
    })
}
