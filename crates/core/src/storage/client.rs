//! Swift object-storage client with lazy Keystone authentication.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::Path;

use reqwest::header::{CONTENT_TYPE, DATE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use super::body::{ByteStream, stream_from_path};
use super::config::{ApplicationCredential, SwiftConfig};
use super::date::http_date_now;
use super::error::StorageError;

/// Response header carrying the issued token.
pub const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";
/// Request header presenting the token to object storage.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";
/// Content type sent when the caller does not override it.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Opaque bearer token issued by the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Token value as sent in `X-Auth-Token`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Object operations the upload provider depends on.
///
/// Implemented by [`SwiftClient`]; other backends can stand in for it.
pub trait ObjectStore: Send + Sync {
    /// Upload a byte stream and return the object's URL.
    fn upload_stream(
        &self,
        container: &str,
        stream: ByteStream,
        object_key: &str,
        extra_headers: &HashMap<String, String>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Delete an object.
    fn delete_file(
        &self,
        container: &str,
        object_key: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Serialize)]
struct AuthBody<'a> {
    identity: Identity<'a>,
}

#[derive(Serialize)]
struct Identity<'a> {
    methods: [&'static str; 1],
    application_credential: &'a ApplicationCredential,
}

impl<'a> TokenRequest<'a> {
    fn application_credential(credential: &'a ApplicationCredential) -> Self {
        Self {
            auth: AuthBody {
                identity: Identity {
                    methods: ["application_credential"],
                    application_credential: credential,
                },
            },
        }
    }
}

/// Client for a single Swift account.
///
/// The token is fetched on first use and cached for the life of the client.
/// It is never refreshed: once the identity service has issued a token, a
/// later 401/403 from object storage is returned to the caller as
/// [`StorageError::UnexpectedStatus`] and the same token is reused on the
/// next call.
pub struct SwiftClient {
    http: reqwest::Client,
    config: SwiftConfig,
    endpoint: String,
    token: RwLock<Option<AuthToken>>,
}

impl fmt::Debug for SwiftClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwiftClient")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SwiftClient {
    /// Create a client with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SwiftConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client that reuses an existing HTTP client.
    #[must_use]
    pub fn with_http_client(config: SwiftConfig, http: reqwest::Client) -> Self {
        let endpoint = config.endpoint();
        Self {
            http,
            config,
            endpoint,
            token: RwLock::new(None),
        }
    }

    /// Account endpoint, `{object_storage_url}/AUTH_{project_id}`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &SwiftConfig {
        &self.config
    }

    /// URL of an object: `{endpoint}/{container}/{object_key}`.
    ///
    /// Each `/`-separated segment is percent-encoded, so the returned URL is
    /// exactly the one requested even when a key contains ` `, `?` or `#`.
    #[must_use]
    pub fn object_url(&self, container: &str, object_key: &str) -> String {
        let key = object_key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{key}", self.endpoint, urlencoding::encode(container))
    }

    /// Whether a token has been cached.
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Request a new token from the identity service.
    ///
    /// Does not touch the cache; see [`Self::ensure_token`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Authentication`] if the identity service
    /// answers with a non-2xx status or without an `X-Subject-Token` header,
    /// and [`StorageError::Transport`] if it cannot be reached.
    #[instrument(skip(self), fields(auth_url = %self.config.auth_url))]
    pub async fn authenticate(&self) -> Result<AuthToken, StorageError> {
        let url = self.config.token_url();
        let body = TokenRequest::application_credential(&self.config.credential);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "identity service unreachable"))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "identity service rejected credentials");
            return Err(StorageError::authentication(format!(
                "identity service returned HTTP {}",
                status.as_u16()
            )));
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| AuthToken(value.to_string()));

        match token {
            Some(token) => {
                info!("authenticated with identity service");
                Ok(token)
            }
            None => {
                error!("identity response carried no token");
                Err(StorageError::authentication("no token received"))
            }
        }
    }

    /// Return the cached token, authenticating first if there is none.
    ///
    /// # Errors
    ///
    /// Propagates any [`Self::authenticate`] failure; nothing is cached then.
    pub async fn ensure_token(&self) -> Result<AuthToken, StorageError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let token = self.authenticate().await?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Upload a stream as `{container}/{object_key}` and return its URL.
    ///
    /// `extra_headers` are applied last and override the defaults, which is
    /// how callers set the object's `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails, a header is invalid, the
    /// request cannot be sent, or object storage answers non-2xx.
    #[instrument(skip(self, stream, extra_headers))]
    pub async fn upload_stream(
        &self,
        container: &str,
        stream: ByteStream,
        object_key: &str,
        extra_headers: &HashMap<String, String>,
    ) -> Result<String, StorageError> {
        let token = self.ensure_token().await?;
        let url = self.object_url(container, object_key);
        let headers = request_headers(&token, extra_headers)?;

        debug!(%url, "uploading object");
        let response = self
            .http
            .put(&url)
            .headers(headers)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .inspect_err(|e| error!(error = %e, %url, "object upload failed"))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), %url, "object upload rejected");
            return Err(StorageError::unexpected_status("PUT", url, status.as_u16()));
        }

        info!(%url, "object uploaded");
        Ok(url)
    }

    /// Upload a local file as `{container}/{object_key}` and return its URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be opened, otherwise
    /// the errors of [`Self::upload_stream`].
    pub async fn upload_file(
        &self,
        container: &str,
        local_path: impl AsRef<Path>,
        object_key: &str,
        extra_headers: &HashMap<String, String>,
    ) -> Result<String, StorageError> {
        let local_path = local_path.as_ref();
        let stream = stream_from_path(local_path).await.inspect_err(
            |e| error!(error = %e, path = %local_path.display(), "cannot open file for upload"),
        )?;
        self.upload_stream(container, stream, object_key, extra_headers)
            .await
    }

    /// Delete `{container}/{object_key}`.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails, the request cannot be sent,
    /// or object storage answers non-2xx (including 404).
    #[instrument(skip(self))]
    pub async fn delete_file(&self, container: &str, object_key: &str) -> Result<(), StorageError> {
        let token = self.ensure_token().await?;
        let url = self.object_url(container, object_key);
        let headers = request_headers(&token, &HashMap::new())?;

        debug!(%url, "deleting object");
        let response = self
            .http
            .delete(&url)
            .headers(headers)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, %url, "object delete failed"))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), %url, "object delete rejected");
            return Err(StorageError::unexpected_status(
                "DELETE",
                url,
                status.as_u16(),
            ));
        }

        info!(%url, "object deleted");
        Ok(())
    }
}

impl ObjectStore for SwiftClient {
    fn upload_stream(
        &self,
        container: &str,
        stream: ByteStream,
        object_key: &str,
        extra_headers: &HashMap<String, String>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send {
        SwiftClient::upload_stream(self, container, stream, object_key, extra_headers)
    }

    fn delete_file(
        &self,
        container: &str,
        object_key: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        SwiftClient::delete_file(self, container, object_key)
    }
}

/// Builds `Date`, `Content-Type`, and `X-Auth-Token`, then applies overrides.
fn request_headers(
    token: &AuthToken,
    extra_headers: &HashMap<String, String>,
) -> Result<HeaderMap, StorageError> {
    let mut headers = HeaderMap::new();
    headers.insert(DATE, header_value(&http_date_now())?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(
        HeaderName::from_static(AUTH_TOKEN_HEADER),
        header_value(token.as_str())?,
    );

    for (name, value) in extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| StorageError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| StorageError::InvalidHeader(format!("value of {name}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, StorageError> {
    HeaderValue::from_str(value).map_err(|_| StorageError::InvalidHeader(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::Scope;

    fn client() -> SwiftClient {
        let config = SwiftConfig::new(
            "https://id.example",
            "https://obj.example",
            "",
            ApplicationCredential::new("cred-id", "cred-secret"),
            Scope::project("p1"),
        );
        SwiftClient::new(config).expect("client builds")
    }

    fn token(value: &str) -> AuthToken {
        AuthToken(value.to_string())
    }

    #[test]
    fn test_object_url() {
        assert_eq!(
            client().object_url("media", "uploads/abc123.png"),
            "https://obj.example/AUTH_p1/media/uploads/abc123.png"
        );
    }

    #[test]
    fn test_object_url_encodes_key_segments() {
        assert_eq!(
            client().object_url("media", "my uploads/a b?#1.png"),
            "https://obj.example/AUTH_p1/media/my%20uploads/a%20b%3F%231.png"
        );
    }

    #[test]
    fn test_token_request_body() {
        let credential = ApplicationCredential::new("cred-id", "cred-secret");
        let body = serde_json::to_value(TokenRequest::application_credential(&credential))
            .expect("serializes");
        assert_eq!(
            body,
            serde_json::json!({
                "auth": {
                    "identity": {
                        "methods": ["application_credential"],
                        "application_credential": { "id": "cred-id", "secret": "cred-secret" }
                    }
                }
            })
        );
    }

    #[test]
    fn test_default_request_headers() {
        let headers = request_headers(&token("tok"), &HashMap::new()).expect("headers");
        assert_eq!(headers[CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(headers[AUTH_TOKEN_HEADER], "tok");
        assert!(
            headers[DATE]
                .to_str()
                .expect("ascii date")
                .ends_with(" GMT")
        );
    }

    #[test]
    fn test_extra_headers_override_content_type() {
        let extra = HashMap::from([("Content-Type".to_string(), "image/png".to_string())]);
        let headers = request_headers(&token("tok"), &extra).expect("headers");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_invalid_extra_header_is_rejected() {
        let extra = HashMap::from([("bad header".to_string(), "x".to_string())]);
        let err = request_headers(&token("tok"), &extra).unwrap_err();
        assert!(matches!(err, StorageError::InvalidHeader(_)));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        assert_eq!(format!("{:?}", token("secret-token")), "AuthToken(<redacted>)");
    }

    #[tokio::test]
    async fn test_new_client_has_no_token() {
        assert!(!client().has_token().await);
    }
}
