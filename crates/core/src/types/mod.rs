//! Core types for the merchant admin toolkit.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod localized;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use localized::{FieldKind, LanguageCode, LocalizedText};
pub use price::{CurrencyCode, Price};
pub use status::*;
