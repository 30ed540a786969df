//! Provider error types.

use swiftmedia_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced to the host by the upload provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// File carries neither a stream nor a buffer.
    #[error("missing file stream or buffer")]
    MissingPayload,

    /// Provider settings are unusable.
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// Authentication or object-storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingPayload => Self::Validation(err.to_string()),
            ProviderError::Configuration(msg) => Self::Configuration(msg),
            ProviderError::Storage(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_payload_display() {
        assert_eq!(
            ProviderError::MissingPayload.to_string(),
            "missing file stream or buffer"
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: ProviderError = StorageError::authentication("no token received").into();
        assert_eq!(err.to_string(), "authentication failed: no token received");
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = ProviderError::MissingPayload.into();
        assert!(matches!(app, AppError::Validation(_)));

        let app: AppError = ProviderError::from(StorageError::authentication("x")).into();
        assert!(matches!(app, AppError::Unauthorized(_)));
    }
}
