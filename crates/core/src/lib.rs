//! Merchant Admin Core - Shared catalog types and the variant generator.
//!
//! This crate provides the types used across all merchant admin components:
//! - `client` - Resilient REST client for the merchant backend
//! - `cli` - Command-line tools for catalog and order management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no token storage. This keeps it lightweight and allows the variant
//! generator to be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and localized text
//! - [`models`] - Resource payloads exchanged with the backend
//! - [`variants`] - Product options, the cartesian variant generator and the variant editor

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;
pub mod variants;

pub use models::*;
pub use types::*;
pub use variants::{
    MAX_OPTIONS, OptionSet, ProductOption, StockCheck, Variant, VariantError, VariantSet,
    VariantsUpdate, derive_sku, generate_variants,
};
