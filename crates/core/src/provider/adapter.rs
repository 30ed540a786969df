//! Upload provider backed by an object store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use swiftmedia_shared::StorageSettings;
use tracing::{error, info};

use super::error::ProviderError;
use super::file::MediaFile;
use crate::storage::{ObjectStore, SwiftClient, SwiftConfig};

/// Operations a host calls on its upload provider.
pub trait UploadProvider: Send + Sync {
    /// Store the file's payload and set `file.url`.
    fn upload(
        &self,
        file: &mut MediaFile,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Same as [`Self::upload`]; hosts call this name for streamed files.
    fn upload_stream(
        &self,
        file: &mut MediaFile,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        self.upload(file)
    }

    /// Remove the object previously stored for `file`.
    fn delete(&self, file: &MediaFile) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Whether stored objects need signed access. Objects are addressed by
    /// their plain URL, so this is always `false`.
    ///
    /// Unlike the other operations this is synchronous: the answer is a
    /// constant and involves no I/O.
    fn is_private(&self) -> bool;
}

/// Provider that stores files in one container of an [`ObjectStore`].
#[derive(Debug)]
pub struct SwiftProvider<S: ObjectStore = SwiftClient> {
    store: Arc<S>,
    container: String,
    prefix: Option<String>,
}

impl SwiftProvider<SwiftClient> {
    /// Build the Swift client and provider from host settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is empty or the HTTP client
    /// cannot be built.
    pub fn init(settings: &StorageSettings) -> Result<Self, ProviderError> {
        settings
            .validate()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        let client = SwiftClient::new(SwiftConfig::from_settings(settings))?;
        info!(
            endpoint = client.endpoint(),
            container = %settings.container,
            prefix = settings.prefix().unwrap_or_default(),
            "swift provider initialized"
        );

        Ok(Self::new(
            Arc::new(client),
            &settings.container,
            settings.prefix(),
        ))
    }
}

impl<S: ObjectStore> SwiftProvider<S> {
    /// Create a provider over an existing store.
    #[must_use]
    pub fn new(store: Arc<S>, container: impl Into<String>, prefix: Option<&str>) -> Self {
        Self {
            store,
            container: container.into(),
            prefix: prefix.filter(|p| !p.is_empty()).map(String::from),
        }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Target container.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Key prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Object key used for both upload and delete of `file`.
    #[must_use]
    pub fn object_key(&self, file: &MediaFile) -> String {
        file.object_key(self.prefix())
    }
}

impl<S: ObjectStore> UploadProvider for SwiftProvider<S> {
    async fn upload(&self, file: &mut MediaFile) -> Result<(), ProviderError> {
        let payload = file.payload.take().ok_or_else(|| {
            error!(hash = %file.hash, "upload called without stream or buffer");
            ProviderError::MissingPayload
        })?;

        let key = self.object_key(file);
        let mut headers = HashMap::new();
        if !file.mime.is_empty() {
            headers.insert("Content-Type".to_string(), file.mime.clone());
        }

        info!(key = %key, container = %self.container, size = file.size, "uploading file");
        let url = self
            .store
            .upload_stream(&self.container, payload.into_stream(), &key, &headers)
            .await
            .inspect_err(|e| error!(error = %e, key = %key, "file upload failed"))?;

        file.url = Some(url);
        Ok(())
    }

    fn delete(&self, file: &MediaFile) -> impl Future<Output = Result<(), ProviderError>> + Send {
        // A streaming payload is not `Sync`, so the file must not be held
        // across the await.
        let key = self.object_key(file);

        async move {
            info!(key = %key, container = %self.container, "deleting file");
            self.store
                .delete_file(&self.container, &key)
                .await
                .inspect_err(|e| error!(error = %e, key = %key, "file delete failed"))?;

            Ok(())
        }
    }

    fn is_private(&self) -> bool {
        false
    }
}
