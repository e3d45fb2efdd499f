//! Error types for the homepanel client

use crate::validation::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the client library.
///
/// `Clone` so that a single in-flight fetch can hand the same outcome to
/// every caller waiting on it.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Administrator account required")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message carried in the error body (`detail` or `message`), falling
    /// back to the raw body text
    pub fn detail(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        if body.trim().is_empty() {
            return None;
        }
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
        parsed
            .get("detail")
            .or_else(|| parsed.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| Some(body.trim().to_string()))
    }

    /// Text suitable for showing to the user next to the failed action
    pub fn user_message(&self) -> String {
        match self {
            ApiError::SessionExpired => "Your session has expired. Please log in again.".into(),
            ApiError::NotAuthenticated => "You are not logged in.".into(),
            ApiError::Forbidden => "This action requires an administrator account.".into(),
            ApiError::NotFound(what) => what.clone(),
            ApiError::Validation(e) => e.to_string(),
            ApiError::Transport(_) => "Could not reach the server.".into(),
            ApiError::Status { status: 401, .. } => self
                .detail()
                .unwrap_or_else(|| "You are not authorized. Please log in again.".into()),
            ApiError::Status { status: 409, .. } => self
                .detail()
                .unwrap_or_else(|| "This item is already registered.".into()),
            _ => "An unexpected error occurred.".into(),
        }
    }

    /// Like `user_message`, but a bare 401 means the credentials were wrong
    pub fn login_failure_message(&self) -> String {
        match self {
            ApiError::Status { status: 401, .. } => self
                .detail()
                .unwrap_or_else(|| "Invalid username or password.".into()),
            _ => self.user_message(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_json_field() {
        let err = ApiError::Status {
            status: 401,
            body: r#"{"detail":"Incorrect username or password"}"#.into(),
        };
        assert_eq!(err.detail().as_deref(), Some("Incorrect username or password"));
        assert_eq!(err.user_message(), "Incorrect username or password");
    }

    #[test]
    fn test_unknown_status_collapses_to_generic_message() {
        let err = ApiError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "An unexpected error occurred.");
    }

    #[test]
    fn test_bare_401_wording_depends_on_context() {
        let err = ApiError::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(
            err.user_message(),
            "You are not authorized. Please log in again."
        );
        assert_eq!(err.login_failure_message(), "Invalid username or password.");
        assert_eq!(
            ApiError::SessionExpired.login_failure_message(),
            ApiError::SessionExpired.user_message()
        );
    }
}
