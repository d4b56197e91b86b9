//! Status mapping and transport failures.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use merchant_admin_client::{
    ApiClient, ApiError, ClientConfig, MemoryTokenStore, RequestOptions,
};
use merchant_admin_core::ProductId;
use merchant_admin_integration_tests::{ACCESS_FRESH, MockBackend, REFRESH_ROTATED};
use serde_json::Value;

fn fresh_session() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_session(ACCESS_FRESH, REFRESH_ROTATED))
}

#[tokio::test]
async fn forbidden_maps_to_permission_message() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(fresh_session());

    let err = client.get::<Value>("forbidden").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(
        err.user_message(),
        "You do not have permission to perform this action."
    );
    assert!(!err.requires_reauthentication());
    assert_eq!(backend.state.refresh_count(), 0);
}

#[tokio::test]
async fn not_found_carries_backend_message() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(fresh_session());

    let err = client
        .get_product(&ProductId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Http { status: 404, message } if message == "Product not found"
    ));
    assert_eq!(err.user_message(), "The requested resource was not found.");
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(fresh_session());

    let err = client.get::<Value>("boom").await.unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Http { status: 500, message } if message == "Internal Server Error"
    ));
    assert_eq!(err.user_message(), "Server error. Please try again later.");
    assert_eq!(backend.state.request_ids().len(), 1);
}

#[tokio::test]
async fn per_call_timeout_surfaces_as_network_error() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(fresh_session());

    let options = RequestOptions::new().with_timeout(Duration::from_millis(100));
    let err = client.get_with::<Value>("slow", &options).await.unwrap_err();
    assert!(matches!(&err, ApiError::Network(e) if e.is_timeout()));
    assert!(err.user_message().contains("timed out"));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(&format!("http://{addr}")).unwrap();
    let client = ApiClient::new(&config, fresh_session()).unwrap();

    let err = client.get::<Value>("products").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        err.user_message(),
        "Could not reach the server. Check your connection and try again."
    );
}
