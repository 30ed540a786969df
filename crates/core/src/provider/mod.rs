//! Media upload provider.
//!
//! Bridges the host's file descriptor to an [`ObjectStore`](crate::storage::ObjectStore):
//! - derives the object key `{prefix}/{hash}{ext}`
//! - normalizes stream and buffer payloads into one byte stream
//! - writes the resulting object URL back onto the file

mod adapter;
mod error;
mod file;

pub use adapter::{SwiftProvider, UploadProvider};
pub use error::ProviderError;
pub use file::{MediaFile, Payload, object_key};
