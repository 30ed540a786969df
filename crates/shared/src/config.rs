//! Application configuration management.

use std::fmt;

use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Object-storage connection settings.
    pub storage: StorageSettings,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Connection settings for the identity service and the Swift object store.
///
/// Field names follow the host plugin's option names. The camelCase spellings
/// used by the host (`authUrl`, `objectStorageUrl`) are accepted as aliases.
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    /// Identity service base URL, e.g. `https://identity.example/v3`.
    #[serde(alias = "authUrl")]
    pub auth_url: String,
    /// Object-storage base URL, without the `AUTH_{project}` suffix.
    #[serde(alias = "objectStorageUrl")]
    pub object_storage_url: String,
    /// Region name. Accepted for completeness, never used for routing.
    #[serde(default)]
    pub region: String,
    /// Application credential ID.
    pub application_credential_id: String,
    /// Application credential secret.
    pub application_credential_secret: String,
    /// Project the object-storage endpoint is scoped to.
    pub project_id: String,
    /// Container that receives uploads.
    pub container: String,
    /// Optional path prefix prepended to every object key.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("auth_url", &self.auth_url)
            .field("object_storage_url", &self.object_storage_url)
            .field("region", &self.region)
            .field("application_credential_id", &self.application_credential_id)
            .field("application_credential_secret", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("container", &self.container)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl StorageSettings {
    /// Checks that every required field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first empty field.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("auth_url", &self.auth_url),
            ("object_storage_url", &self.object_storage_url),
            ("application_credential_id", &self.application_credential_id),
            (
                "application_credential_secret",
                &self.application_credential_secret,
            ),
            ("project_id", &self.project_id),
            ("container", &self.container),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Configuration(format!(
                    "storage.{name} must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Returns the prefix if one is set and non-empty.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info,swiftmedia=debug".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SWIFTMEDIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings() -> StorageSettings {
        StorageSettings {
            auth_url: "https://id.example".to_string(),
            object_storage_url: "https://obj.example".to_string(),
            region: "RegionOne".to_string(),
            application_credential_id: "cred-id".to_string(),
            application_credential_secret: "cred-secret".to_string(),
            project_id: "p1".to_string(),
            container: "media".to_string(),
            prefix: None,
        }
    }

    const REQUIRED_ENV: [(&str, Option<&str>); 6] = [
        ("SWIFTMEDIA__STORAGE__AUTH_URL", Some("https://id.example")),
        (
            "SWIFTMEDIA__STORAGE__OBJECT_STORAGE_URL",
            Some("https://obj.example"),
        ),
        ("SWIFTMEDIA__STORAGE__APPLICATION_CREDENTIAL_ID", Some("cred-id")),
        (
            "SWIFTMEDIA__STORAGE__APPLICATION_CREDENTIAL_SECRET",
            Some("cred-secret"),
        ),
        ("SWIFTMEDIA__STORAGE__PROJECT_ID", Some("p1")),
        ("SWIFTMEDIA__STORAGE__CONTAINER", Some("media")),
    ];

    #[test]
    fn test_load_from_environment() {
        let config = temp_env::with_vars(REQUIRED_ENV, AppConfig::load).expect("config loads");

        assert_eq!(config.storage.auth_url, "https://id.example");
        assert_eq!(config.storage.object_storage_url, "https://obj.example");
        assert_eq!(config.storage.project_id, "p1");
        assert_eq!(config.storage.container, "media");
        assert_eq!(config.storage.region, "");
        assert!(config.storage.prefix.is_none());
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.log.filter, "info,swiftmedia=debug");
    }

    #[test]
    fn test_load_optional_fields_from_environment() {
        let mut vars = REQUIRED_ENV.to_vec();
        vars.push(("SWIFTMEDIA__STORAGE__PREFIX", Some("uploads")));
        vars.push(("SWIFTMEDIA__STORAGE__REGION", Some("RegionOne")));
        vars.push(("SWIFTMEDIA__LOG__FORMAT", Some("json")));

        let config = temp_env::with_vars(vars, AppConfig::load).expect("config loads");

        assert_eq!(config.storage.prefix(), Some("uploads"));
        assert_eq!(config.storage.region, "RegionOne");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_load_missing_required_field_fails() {
        let result = temp_env::with_vars(
            [
                ("SWIFTMEDIA__STORAGE__AUTH_URL", Some("https://id.example")),
                ("SWIFTMEDIA__STORAGE__CONTAINER", Some("media")),
            ],
            AppConfig::load,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_host_camel_case_keys_from_file() {
        let toml = r#"
            [storage]
            authUrl = "https://id.example"
            objectStorageUrl = "https://obj.example"
            application_credential_id = "cred-id"
            application_credential_secret = "cred-secret"
            project_id = "p1"
            container = "media"
        "#;

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(config::Config::try_deserialize)
            .expect("config loads");

        assert_eq!(config.storage.auth_url, "https://id.example");
        assert_eq!(config.storage.object_storage_url, "https://obj.example");
        assert_eq!(config.storage.container, "media");
    }

    #[test]
    fn test_validate_accepts_complete_settings() {
        assert!(settings().validate().is_ok());
    }

    #[rstest]
    #[case::auth_url("auth_url")]
    #[case::object_storage_url("object_storage_url")]
    #[case::credential_id("application_credential_id")]
    #[case::credential_secret("application_credential_secret")]
    #[case::project_id("project_id")]
    #[case::container("container")]
    fn test_validate_rejects_empty_field(#[case] field: &str) {
        let mut s = settings();
        match field {
            "auth_url" => s.auth_url.clear(),
            "object_storage_url" => s.object_storage_url.clear(),
            "application_credential_id" => s.application_credential_id.clear(),
            "application_credential_secret" => s.application_credential_secret = "  ".into(),
            "project_id" => s.project_id.clear(),
            "container" => s.container.clear(),
            _ => unreachable!(),
        }

        let err = s.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains(field));
    }

    #[test]
    fn test_empty_prefix_is_treated_as_none() {
        let mut s = settings();
        s.prefix = Some(String::new());
        assert_eq!(s.prefix(), None);
        s.prefix = Some("uploads".to_string());
        assert_eq!(s.prefix(), Some("uploads"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", settings());
        assert!(!rendered.contains("cred-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
