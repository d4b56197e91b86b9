//! CLI error type.

use merchant_admin_client::{ApiError, ConfigError};
use merchant_admin_core::{EmailError, VariantError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Options or variant edits were rejected.
    #[error("Invalid variants: {0}")]
    Variant(#[from] VariantError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// The interactive prompt could not be shown.
    #[error("Could not read input: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// The backend refused the login.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Command needs a session and none is stored.
    #[error("Not logged in. Run `ma-cli login` first.")]
    NotLoggedIn,
}

impl CliError {
    /// Text shown to the user on failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use merchant_admin_client::RefreshFailure;

    use super::*;

    #[test]
    fn test_refresh_failure_asks_for_login() {
        let err = CliError::from(ApiError::from(RefreshFailure::SessionEnded));
        assert_eq!(
            err.user_message(),
            "Your session has expired. Please log in again."
        );
    }

    #[test]
    fn test_variant_errors_are_shown_verbatim() {
        let err = CliError::from(VariantError::NoOptions);
        assert_eq!(
            err.user_message(),
            "Invalid variants: at least one option is required"
        );
    }
}
