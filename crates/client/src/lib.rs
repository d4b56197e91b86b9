//! Merchant Admin Client library.
//!
//! REST client for the merchant backend. Every call carries the stored access
//! token as a bearer credential; an expired token is recovered transparently
//! with a single-flight refresh that all concurrently failing requests share.
//!
//! # Architecture
//!
//! - [`client::ApiClient`] - request pipeline, 401 recovery and typed helpers
//! - [`refresh::RefreshCoordinator`] - `Idle → Refreshing → Idle` state machine
//! - [`storage`] - the secure token store seam and its implementations
//! - [`auth`] - login, refresh and logout against `/auth/*`
//! - [`services`] - thin wrappers over the products, categories, orders and
//!   settings endpoints
//!
//! # Security
//!
//! Tokens are held as [`secrecy::SecretString`] and are never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod refresh;
pub mod services;
pub mod storage;

pub use client::{ApiClient, ApiResponse, RequestOptions};
pub use config::{ClientConfig, ConfigError, LogFormat, TelemetryConfig};
pub use error::ApiError;
pub use refresh::{RefreshCoordinator, RefreshFailure};
pub use storage::{FileTokenStore, MemoryTokenStore, StoreError, TokenKey, TokenStore};
