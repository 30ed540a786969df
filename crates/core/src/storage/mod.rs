//! OpenStack Swift storage client.
//!
//! Authenticates against Keystone with an application credential and issues
//! signed object requests against a single Swift account.
//!
//! # Request flow
//!
//! ```text
//! upload_stream / delete_file
//!        │
//!        ▼
//! ensure_token ──(no token cached)──► POST {auth_url}/auth/tokens
//!        │                              └─ X-Subject-Token
//!        ▼
//! PUT|DELETE {object_storage_url}/AUTH_{project}/{container}/{key}
//!        Date: <RFC 7231>   X-Auth-Token: <token>   Content-Type: ...
//! ```

mod body;
mod client;
mod config;
mod date;
mod error;

pub use body::{ByteStream, stream_from_bytes, stream_from_path};
pub use client::{
    AUTH_TOKEN_HEADER, AuthToken, DEFAULT_CONTENT_TYPE, ObjectStore, SUBJECT_TOKEN_HEADER,
    SwiftClient,
};
pub use config::{ApplicationCredential, Scope, SwiftConfig};
pub use date::{http_date, http_date_now};
pub use error::StorageError;
