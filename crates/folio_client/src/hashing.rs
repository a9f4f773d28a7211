//! Content hashing for dropped files.
//!
//! The digest is the identity of a file inside a folder while it is in
//! flight, so it must be stable across retries of the same content.

use folio_error::{FolioResult, UploadError, UploadErrorKind};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_CHUNK: usize = 64 * 1024;

/// Hex SHA-256 digest of an in-memory buffer.
///
/// # Examples
///
/// ```
/// use folio_client::hashing::hash_bytes;
///
/// assert_eq!(
///     hash_bytes(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Hex SHA-256 digest of a file, streamed from disk.
#[tracing::instrument]
pub async fn hash_file(path: &Path) -> FolioResult<String> {
    let hashing_error = |e: std::io::Error| {
        UploadError::new(UploadErrorKind::Hashing(format!("{}: {}", path.display(), e)))
    };

    let mut file = tokio::fs::File::open(path).await.map_err(hashing_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut buffer).await.map_err(hashing_error)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
