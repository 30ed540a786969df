//! Building host file descriptors from local files.

use std::path::Path;

use sha2::{Digest, Sha256};
use swiftmedia_core::provider::MediaFile;
use swiftmedia_core::storage::stream_from_path;
use swiftmedia_shared::AppResult;
use tokio::io::AsyncReadExt;

const HASH_CHUNK: usize = 64 * 1024;

/// SHA-256 of a file's content as lowercase hex.
pub async fn sha256_file(path: &Path) -> AppResult<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Extension with a leading dot, or `None` if empty.
pub fn normalize_ext(ext: Option<&str>) -> Option<String> {
    let ext = ext?.trim();
    if ext.is_empty() || ext == "." {
        return None;
    }
    Some(if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    })
}

/// Extension of `path` with a leading dot.
pub fn path_ext(path: &Path) -> Option<String> {
    normalize_ext(path.extension().and_then(|e| e.to_str()))
}

/// Describes a local file as the host would and attaches it as a stream.
pub async fn media_file_from_path(
    path: &Path,
    hash: Option<String>,
    mime: Option<String>,
) -> AppResult<MediaFile> {
    let hash = match hash {
        Some(hash) => hash,
        None => sha256_file(path).await?,
    };
    let mime = mime.unwrap_or_else(|| {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string()
    });
    let size = tokio::fs::metadata(path).await?.len();
    let stream = stream_from_path(path).await?;
    let ext = path_ext(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(MediaFile::new(hash, ext.as_deref(), mime)
        .with_name(name)
        .with_stream(stream, size))
}
