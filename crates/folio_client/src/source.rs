//! Files selected for upload.

use bytes::Bytes;
use folio_error::{FolioResult, UploadError, UploadErrorKind};
use std::path::{Path, PathBuf};

/// Where the bytes of an upload live.
#[derive(Debug, Clone)]
pub enum SourceContent {
    /// Already in memory
    Bytes(Bytes),
    /// On local disk, streamed when hashed and sent
    File(PathBuf),
}

/// A file the user dropped onto a folder.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct UploadSource {
    name: String,
    mime: String,
    size: u64,
    content: SourceContent,
}

impl UploadSource {
    /// An in-memory source.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            mime: mime.into(),
            size: data.len() as u64,
            content: SourceContent::Bytes(data),
        }
    }

    /// A file on disk; the MIME type is guessed from the extension.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn from_path(path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            UploadError::new(UploadErrorKind::Hashing(format!("{}: {}", path.display(), e)))
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            mime,
            size: metadata.len(),
            content: SourceContent::File(path.to_path_buf()),
        })
    }

    /// The full content, reading it from disk if needed.
    pub async fn read_all(&self) -> FolioResult<Bytes> {
        match &self.content {
            SourceContent::Bytes(data) => Ok(data.clone()),
            SourceContent::File(path) => tokio::fs::read(path).await.map(Bytes::from).map_err(|e| {
                UploadError::new(UploadErrorKind::TransferFailed(format!("{}: {}", path.display(), e))).into()
            }),
        }
    }

    /// SHA-256 digest of the content.
    pub async fn content_hash(&self) -> FolioResult<String> {
        match &self.content {
            SourceContent::Bytes(data) => {
                let data = data.clone();
                tokio::task::spawn_blocking(move || crate::hashing::hash_bytes(&data))
                    .await
                    .map_err(|e| UploadError::new(UploadErrorKind::Hashing(e.to_string())).into())
            }
            SourceContent::File(path) => crate::hashing::hash_file(path).await,
        }
    }
}
