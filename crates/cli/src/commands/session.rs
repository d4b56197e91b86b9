//! Login, logout and session status.
//!
//! # Environment Variables
//!
//! - `MERCHANT_PASSWORD` - Password for `login`; prompted for without echo when unset

use dialoguer::Password;
use merchant_admin_client::{ApiClient, ApiError, ClientConfig};
use merchant_admin_core::Email;
use secrecy::SecretString;

use super::out;
use crate::error::CliError;

/// Log in and store the session tokens.
pub async fn login(client: &ApiClient, email: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let password = read_password()?;

    match client.login(&email, &password).await {
        Ok(()) => {
            out(&format!("Logged in as {email}"));
            Ok(())
        }
        Err(ApiError::Http { status: 401, .. }) => Err(CliError::InvalidCredentials),
        Err(e) => Err(e.into()),
    }
}

/// End the session. Succeeds even if the backend cannot be reached.
pub async fn logout(client: &ApiClient) -> Result<(), CliError> {
    client.logout().await?;
    out("Logged out");
    Ok(())
}

/// Show the configured backend and whether a session is stored.
pub fn status(client: &ApiClient, config: &ClientConfig) -> Result<(), CliError> {
    out(&format!("API:      {}", client.base_url()));
    out(&format!("Session:  {}", config.token_file.display()));
    if client.is_authenticated()? {
        out("Status:   logged in");
    } else {
        out("Status:   not logged in");
    }
    Ok(())
}

fn read_password() -> Result<SecretString, CliError> {
    resolve_password(std::env::var("MERCHANT_PASSWORD").ok(), || {
        Password::new().with_prompt("Password").interact()
    })
}

/// Prefer the environment value; otherwise ask interactively.
fn resolve_password(
    from_env: Option<String>,
    prompt: impl FnOnce() -> dialoguer::Result<String>,
) -> Result<SecretString, CliError> {
    let password = match from_env {
        Some(password) => password,
        None => prompt()?,
    };
    Ok(SecretString::from(password))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_env_password_skips_prompt() {
        let password = resolve_password(Some("from-env".to_string()), || {
            panic!("prompt must not run when MERCHANT_PASSWORD is set")
        })
        .unwrap();
        assert_eq!(password.expose_secret(), "from-env");
    }

    #[test]
    fn test_prompts_without_env() {
        let mut prompted = false;
        let password = resolve_password(None, || {
            prompted = true;
            Ok("typed".to_string())
        })
        .unwrap();
        assert!(prompted);
        assert_eq!(password.expose_secret(), "typed");
    }

    #[test]
    fn test_prompt_failure_is_reported() {
        let err = resolve_password(None, || {
            Err(dialoguer::Error::IO(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "not a terminal",
            )))
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Prompt(_)));
    }
}
