//! Storage client configuration types.

use std::fmt;

use serde::Serialize;
use swiftmedia_shared::StorageSettings;

/// Application credential used to obtain a session token.
#[derive(Clone, Serialize)]
pub struct ApplicationCredential {
    /// Credential ID.
    pub id: String,
    /// Credential secret.
    pub secret: String,
}

impl ApplicationCredential {
    /// Create a new application credential.
    #[must_use]
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for ApplicationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationCredential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Project scope the object-storage endpoint is addressed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Project ID.
    pub project_id: String,
}

impl Scope {
    /// Create a project scope.
    #[must_use]
    pub fn project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

/// Connection configuration for [`SwiftClient`](super::SwiftClient).
#[derive(Debug, Clone)]
pub struct SwiftConfig {
    /// Identity service base URL.
    pub auth_url: String,
    /// Object-storage base URL, without the account suffix.
    pub object_storage_url: String,
    /// Region name. Kept for completeness; does not affect the endpoint.
    pub region: String,
    /// Credential presented to the identity service.
    pub credential: ApplicationCredential,
    /// Project scope.
    pub scope: Scope,
}

impl SwiftConfig {
    /// Create a new client configuration.
    #[must_use]
    pub fn new(
        auth_url: impl Into<String>,
        object_storage_url: impl Into<String>,
        region: impl Into<String>,
        credential: ApplicationCredential,
        scope: Scope,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            object_storage_url: object_storage_url.into(),
            region: region.into(),
            credential,
            scope,
        }
    }

    /// Build from the host-facing storage settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(
            &settings.auth_url,
            &settings.object_storage_url,
            &settings.region,
            ApplicationCredential::new(
                &settings.application_credential_id,
                &settings.application_credential_secret,
            ),
            Scope::project(&settings.project_id),
        )
    }

    /// Identity token endpoint: `{auth_url}/auth/tokens`.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/auth/tokens", self.auth_url.trim_end_matches('/'))
    }

    /// Account endpoint: `{object_storage_url}/AUTH_{project_id}`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/AUTH_{}",
            self.object_storage_url.trim_end_matches('/'),
            self.scope.project_id
        )
    }
}
