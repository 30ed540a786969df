//! Host file descriptor and object key derivation.

use std::fmt;

use bytes::Bytes;

use crate::storage::{ByteStream, stream_from_bytes};

/// Where an upload's bytes come from.
pub enum Payload {
    /// Bytes streamed from elsewhere, consumed once.
    Stream(ByteStream),
    /// Bytes already held in memory.
    Buffer(Bytes),
}

impl Payload {
    /// Normalizes either source into one byte stream.
    #[must_use]
    pub fn into_stream(self) -> ByteStream {
        match self {
            Self::Stream(stream) => stream,
            Self::Buffer(buffer) => stream_from_bytes(buffer),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Buffer(buffer) => write!(f, "Buffer({} bytes)", buffer.len()),
        }
    }
}

/// A media file handed over by the host.
///
/// Upload reads `hash`, `ext`, `mime` and takes `payload`; on success it
/// writes the object URL into `url`.
#[derive(Debug)]
pub struct MediaFile {
    /// Original file name.
    pub name: String,
    /// Content hash; the stable part of the object key.
    pub hash: String,
    /// Extension including the leading dot, e.g. `.png`.
    pub ext: Option<String>,
    /// MIME type sent as the object's `Content-Type`.
    pub mime: String,
    /// Size in bytes as reported by the host.
    pub size: u64,
    /// Public URL, set after a successful upload.
    pub url: Option<String>,
    /// Bytes to upload. `None` once consumed or if never supplied.
    pub payload: Option<Payload>,
}

impl MediaFile {
    /// Create a descriptor without a payload.
    #[must_use]
    pub fn new(hash: impl Into<String>, ext: Option<&str>, mime: impl Into<String>) -> Self {
        let hash = hash.into();
        let ext = ext.filter(|e| !e.is_empty()).map(String::from);
        let name = format!("{hash}{}", ext.as_deref().unwrap_or_default());
        Self {
            name,
            hash,
            ext,
            mime: mime.into(),
            size: 0,
            url: None,
            payload: None,
        }
    }

    /// Set the original file name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach an in-memory buffer; also records its size.
    #[must_use]
    pub fn with_buffer(mut self, buffer: impl Into<Bytes>) -> Self {
        let buffer = buffer.into();
        self.size = buffer.len() as u64;
        self.payload = Some(Payload::Buffer(buffer));
        self
    }

    /// Attach a byte stream of the given size.
    #[must_use]
    pub fn with_stream(mut self, stream: ByteStream, size: u64) -> Self {
        self.size = size;
        self.payload = Some(Payload::Stream(stream));
        self
    }

    /// Object key for this file under an optional prefix.
    #[must_use]
    pub fn object_key(&self, prefix: Option<&str>) -> String {
        object_key(&self.hash, self.ext.as_deref(), prefix)
    }
}

/// Builds `{prefix}/{hash}{ext}`, or `{hash}{ext}` without a prefix.
///
/// Empty `ext` and `prefix` are treated as absent.
#[must_use]
pub fn object_key(hash: &str, ext: Option<&str>, prefix: Option<&str>) -> String {
    let file_name = format!("{hash}{}", ext.unwrap_or_default());
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}/{file_name}"),
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use rstest::rstest;

    #[rstest]
    #[case("abc123", Some(".png"), Some("uploads"), "uploads/abc123.png")]
    #[case("abc123", Some(".png"), None, "abc123.png")]
    #[case("abc123", None, Some("uploads"), "uploads/abc123")]
    #[case("abc123", None, None, "abc123")]
    #[case("abc123", Some(""), Some(""), "abc123")]
    #[case("abc123", Some(".tar.gz"), Some("a/b"), "a/b/abc123.tar.gz")]
    fn test_object_key(
        #[case] hash: &str,
        #[case] ext: Option<&str>,
        #[case] prefix: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(object_key(hash, ext, prefix), expected);
    }

    #[test]
    fn test_new_drops_empty_extension() {
        let file = MediaFile::new("abc123", Some(""), "image/png");
        assert_eq!(file.ext, None);
        assert_eq!(file.name, "abc123");
    }

    #[test]
    fn test_with_buffer_records_size() {
        let file = MediaFile::new("abc123", Some(".png"), "image/png").with_buffer(vec![0u8; 17]);
        assert_eq!(file.size, 17);
        assert!(matches!(file.payload, Some(Payload::Buffer(ref b)) if b.len() == 17));
    }

    #[tokio::test]
    async fn test_buffer_payload_normalizes_to_stream() {
        let data = Bytes::from_static(b"hello swift");
        let bytes: Vec<u8> = Payload::Buffer(data.clone())
            .into_stream()
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await
            .expect("stream yields bytes");
        assert_eq!(bytes, data);
    }

    #[test]
    fn test_payload_debug_hides_contents() {
        let payload = Payload::Buffer(Bytes::from_static(b"secret"));
        assert_eq!(format!("{payload:?}"), "Buffer(6 bytes)");
    }
}
