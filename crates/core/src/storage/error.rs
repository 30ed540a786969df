//! Storage error types.

use swiftmedia_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Identity service did not issue a token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// Object storage answered with a non-2xx status.
    #[error("{method} {url} returned HTTP {status}")]
    UnexpectedStatus {
        /// HTTP method of the failed request.
        method: &'static str,
        /// Request URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// Header name or value cannot be sent.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Local file could not be read.
    #[error("i/o error: {0}")]
    Io(String),

    /// Client could not be constructed.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an authentication error.
    #[must_use]
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an unexpected status error.
    #[must_use]
    pub fn unexpected_status(method: &'static str, url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            method,
            url: url.into(),
            status,
        }
    }

    /// Status code of the failed response, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Authentication(_) => Self::Unauthorized(err.to_string()),
            StorageError::Transport(_) | StorageError::UnexpectedStatus { .. } => {
                Self::ExternalService(err.to_string())
            }
            StorageError::InvalidHeader(_) => Self::Validation(err.to_string()),
            StorageError::Io(_) => Self::Io(err.to_string()),
            StorageError::Configuration(_) => Self::Configuration(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = StorageError::unexpected_status("PUT", "https://obj.example/AUTH_p1/c/k", 503);
        assert_eq!(
            err.to_string(),
            "PUT https://obj.example/AUTH_p1/c/k returned HTTP 503"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_status_absent_for_other_errors() {
        assert_eq!(StorageError::authentication("no token").status(), None);
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = StorageError::authentication("no token").into();
        assert!(matches!(app, AppError::Unauthorized(_)));

        let app: AppError = StorageError::unexpected_status("DELETE", "u", 404).into();
        assert!(matches!(app, AppError::ExternalService(_)));

        let app: AppError = StorageError::Io("missing".into()).into();
        assert!(matches!(app, AppError::Io(_)));
    }
}
