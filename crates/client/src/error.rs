//! Client error type and HTTP status mapping.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::refresh::RefreshFailure;
use crate::storage::StoreError;

/// Errors that can occur when calling the merchant API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The session could not be refreshed and has been ended.
    #[error("Authentication failed: {0}")]
    AuthRefresh(#[from] RefreshFailure),

    /// A success response did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The token store failed.
    #[error("Token storage error: {0}")]
    Storage(#[from] StoreError),

    /// The endpoint path could not be joined onto the base URL.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl ApiError {
    /// Build an HTTP error from a status and raw response body.
    ///
    /// The body is only inspected for a `message` field, which may be a
    /// string or a list of strings. Anything else falls back to the
    /// status's canonical reason.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        Self::Http {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status, if the API answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the user has to log in again before retrying.
    #[must_use]
    pub const fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::AuthRefresh(_) | Self::Http { status: 401, .. })
    }

    /// Text suitable for showing to a merchant.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) if e.is_timeout() => {
                "The request timed out. Check your connection and try again.".to_string()
            }
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Http { status: 401, .. } | Self::AuthRefresh(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::Http { status: 403, .. } => {
                "You do not have permission to perform this action.".to_string()
            }
            Self::Http { status: 404, .. } => "The requested resource was not found.".to_string(),
            Self::Http { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_string()
            }
            Self::Http { message, .. } => message.clone(),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::Storage(_) => "Could not access the saved session.".to_string(),
            Self::InvalidPath { .. } => "Invalid request.".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Message {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<Message>,
}

pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let message = match parsed.message? {
        Message::One(message) => message,
        Message::Many(messages) => messages.join("; "),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_string() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"message":"SKU already exists","statusCode":400}"#,
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "SKU already exists");
    }

    #[test]
    fn test_message_list_is_joined() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":["name_en should not be empty","price must be positive"]}"#,
        );
        assert!(matches!(
            err,
            ApiError::Http { status: 422, ref message }
                if message == "name_en should not be empty; price must be positive"
        ));
    }

    #[test]
    fn test_falls_back_to_reason() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert!(matches!(
            err,
            ApiError::Http { status: 502, ref message } if message == "Bad Gateway"
        ));
        assert_eq!(err.user_message(), "Server error. Please try again later.");
    }

    #[test]
    fn test_status_messages() {
        let forbidden = ApiError::from_response(StatusCode::FORBIDDEN, b"{}");
        assert_eq!(
            forbidden.user_message(),
            "You do not have permission to perform this action."
        );
        assert!(!forbidden.requires_reauthentication());

        let missing = ApiError::from_response(StatusCode::NOT_FOUND, br#"{"message":"x"}"#);
        assert_eq!(missing.user_message(), "The requested resource was not found.");
    }

    #[test]
    fn test_refresh_failure_requires_login() {
        let err = ApiError::from(RefreshFailure::SessionEnded);
        assert!(err.requires_reauthentication());
        assert_eq!(err.status(), None);
        assert_eq!(
            err.user_message(),
            "Your session has expired. Please log in again."
        );
    }
}
