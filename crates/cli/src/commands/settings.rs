//! Settings commands.

use merchant_admin_client::ApiClient;

use super::{out, require_session};
use crate::error::CliError;

/// Show enabled payment methods and bank transfer details.
pub async fn payment(client: &ApiClient) -> Result<(), CliError> {
    require_session(client)?;

    let settings = client.payment_settings().await?;
    let methods = settings.enabled_methods();
    if methods.is_empty() {
        out("No payment methods enabled");
    } else {
        out(&format!("Enabled: {}", methods.join(", ")));
    }
    if let Some(bank) = &settings.bank_details {
        out(&format!("Bank:    {} ({})", bank.bank_name, bank.account_name));
        out(&format!("IBAN:    {}", bank.iban));
    }
    Ok(())
}
