//! Login and logout flows.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;

use merchant_admin_client::{ApiError, MemoryTokenStore, TokenKey, TokenStore};
use merchant_admin_core::{Email, ListQuery};
use merchant_admin_integration_tests::{ACCESS_FRESH, MockBackend, PASSWORD, REFRESH_ROTATED};
use secrecy::{ExposeSecret, SecretString};

fn owner() -> Email {
    Email::parse("owner@shop.example").unwrap()
}

#[tokio::test]
async fn login_stores_both_tokens() {
    let backend = MockBackend::spawn().await.unwrap();
    let store = Arc::new(MemoryTokenStore::new());
    let client = backend.client(store.clone());

    client
        .login(&owner(), &SecretString::from(PASSWORD))
        .await
        .unwrap();

    assert!(client.is_authenticated().unwrap());
    let access = store.get(TokenKey::AccessToken).unwrap().unwrap();
    let refresh = store.get(TokenKey::RefreshToken).unwrap().unwrap();
    assert_eq!(access.expose_secret(), ACCESS_FRESH);
    assert_eq!(refresh.expose_secret(), REFRESH_ROTATED);

    client.list_products(&ListQuery::default()).await.unwrap();
    assert_eq!(backend.state.refresh_count(), 0);
}

#[tokio::test]
async fn bad_password_is_not_treated_as_expired_session() {
    let backend = MockBackend::spawn().await.unwrap();
    let store = Arc::new(MemoryTokenStore::new());
    let client = backend.client(store.clone());

    let err = client
        .login(&owner(), &SecretString::from("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Http { status: 401, message } if message == "Invalid credentials"
    ));
    assert!(!client.is_authenticated().unwrap());
    assert_eq!(backend.state.refresh_count(), 0);
}

#[tokio::test]
async fn logout_clears_tokens_even_when_backend_fails() {
    let backend = MockBackend::spawn().await.unwrap();
    let store = MockBackend::expired_session();
    let client = backend.client(store.clone());

    client.logout().await.unwrap();

    assert_eq!(backend.state.logout_calls.load(Ordering::SeqCst), 1);
    assert!(store.get(TokenKey::AccessToken).unwrap().is_none());
    assert!(store.get(TokenKey::RefreshToken).unwrap().is_none());
    assert!(!client.is_authenticated().unwrap());
}

#[tokio::test]
async fn logout_without_session_skips_backend() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(Arc::new(MemoryTokenStore::new()));

    client.logout().await.unwrap();
    assert_eq!(backend.state.logout_calls.load(Ordering::SeqCst), 0);
}
