//! Request body streams.

use std::io;
use std::path::Path;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use tokio_util::io::ReaderStream;

/// Byte stream consumed once as an upload body.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Wraps an in-memory buffer as a single-chunk stream.
#[must_use]
pub fn stream_from_bytes(buffer: impl Into<Bytes>) -> ByteStream {
    let buffer = buffer.into();
    stream::once(async move { Ok(buffer) }).boxed()
}

/// Opens a local file and streams its contents.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened.
pub async fn stream_from_path(path: impl AsRef<Path>) -> io::Result<ByteStream> {
    let file = tokio::fs::File::open(path).await?;
    Ok(ReaderStream::new(file).boxed())
}
