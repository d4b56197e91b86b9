//! Store and payment settings payloads.

use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Email, LanguageCode};

/// General store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Store display name.
    pub store_name: String,
    /// Currency prices are listed in.
    pub currency: CurrencyCode,
    /// Contact address shown to customers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<Email>,
    /// Default storefront language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<LanguageCode>,
    /// Whether the store accepts orders.
    #[serde(default)]
    pub is_open: bool,
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    /// Cash on delivery.
    #[serde(default)]
    pub cash_on_delivery: bool,
    /// Card / online gateway.
    #[serde(default)]
    pub online_payment: bool,
    /// Manual bank transfer.
    #[serde(default)]
    pub bank_transfer: bool,
    /// Account shown to customers paying by bank transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}

impl PaymentSettings {
    /// Names of the enabled methods.
    #[must_use]
    pub fn enabled_methods(&self) -> Vec<&'static str> {
        [
            (self.cash_on_delivery, "cash_on_delivery"),
            (self.online_payment, "online_payment"),
            (self.bank_transfer, "bank_transfer"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }
}

/// Bank account for transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    /// Bank name.
    pub bank_name: String,
    /// Account holder.
    pub account_name: String,
    /// IBAN.
    pub iban: String,
}
