//! Command implementations.

pub mod orders;
pub mod products;
pub mod session;
pub mod settings;
pub mod variants;

use merchant_admin_client::ApiClient;

use crate::error::CliError;

/// Write one line of command output.
#[allow(clippy::print_stdout)]
pub fn out(line: &str) {
    println!("{line}");
}

/// Write an error for the user.
#[allow(clippy::print_stderr)]
pub fn report(message: &str) {
    eprintln!("error: {message}");
}

/// Fail early when neither token is stored. A refresh token alone is
/// enough; the client renews the access token on the first 401.
fn require_session(client: &ApiClient) -> Result<(), CliError> {
    if client.has_session()? {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use merchant_admin_client::{ClientConfig, MemoryTokenStore, TokenKey, TokenStore};
    use secrecy::SecretString;

    use super::*;

    fn client_with(store: MemoryTokenStore) -> ApiClient {
        let config = ClientConfig::new("https://api.shop.example").unwrap();
        ApiClient::new(&config, Arc::new(store)).unwrap()
    }

    #[test]
    fn test_require_session_accepts_refresh_token_only() {
        let store = MemoryTokenStore::new();
        store
            .set(TokenKey::RefreshToken, SecretString::from("refresh"))
            .unwrap();
        assert!(require_session(&client_with(store)).is_ok());
    }

    #[test]
    fn test_require_session_rejects_empty_store() {
        let err = require_session(&client_with(MemoryTokenStore::new())).unwrap_err();
        assert!(matches!(err, CliError::NotLoggedIn));
    }
}
