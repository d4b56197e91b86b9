//! Type-safe price representation using decimal arithmetic.
//!
//! The backend exchanges amounts as JSON numbers; [`Price`] keeps them as
//! [`Decimal`] in memory so repricing a variant never accumulates float error.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency_code)
    }
}

/// ISO 4217 currency code.
///
/// The currencies the store is commonly configured with get their own
/// variant; anything else the backend reports is carried as [`Other`],
/// uppercased. Reading is case-insensitive and never fails.
///
/// [`Other`]: CurrencyCode::Other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CurrencyCode {
    USD,
    EUR,
    GBP,
    SAR,
    AED,
    EGP,
    KWD,
    /// A code without a dedicated variant.
    Other(String),
}

impl CurrencyCode {
    const KNOWN: [Self; 7] = [
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::SAR,
        Self::AED,
        Self::EGP,
        Self::KWD,
    ];

    /// The code as reported, uppercased.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::EGP => "EGP",
            Self::KWD => "KWD",
            Self::Other(code) => code,
        }
    }

    fn normalize(raw: &str) -> Self {
        let code = raw.trim().to_ascii_uppercase();
        Self::KNOWN
            .into_iter()
            .find(|known| known.code() == code)
            .unwrap_or(Self::Other(code))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for CurrencyCode {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        match code {
            CurrencyCode::Other(code) => code,
            known => known.code().to_owned(),
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    /// Strict parse for user input: three ASCII letters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self::normalize(trimmed))
        } else {
            Err(format!("invalid currency code: {trimmed}"))
        }
    }
}
