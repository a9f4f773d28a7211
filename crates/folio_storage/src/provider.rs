//! The provider delegate contract.

use bytes::Bytes;
use folio_core::MediaFile;
use folio_error::{FolioResult, NotImplementedError};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex SHA-256 digest of `data`.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// What a provider needs to know about an object.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ProviderObject {
    hash: String,
    ext: Option<String>,
    mime: String,
    size_bytes: i64,
}

impl ProviderObject {
    /// Describe an object by its hash and extension.
    pub fn new(
        hash: impl Into<String>,
        ext: Option<String>,
        mime: impl Into<String>,
        size_bytes: i64,
    ) -> Self {
        Self {
            hash: hash.into(),
            ext,
            mime: mime.into(),
            size_bytes,
        }
    }

    /// Describe in-memory content, hashing it.
    pub fn for_bytes(data: &[u8], ext: Option<String>, mime: impl Into<String>) -> Self {
        Self::new(content_hash(data), ext, mime, data.len() as i64)
    }

    /// Storage key: `{hash[0:2]}/{hash}{ext}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_storage::ProviderObject;
    ///
    /// let object = ProviderObject::new("abcdef", Some(".png".into()), "image/png", 3);
    /// assert_eq!(object.key(), "ab/abcdef.png");
    /// ```
    pub fn key(&self) -> String {
        let shard = self.hash.get(0..2).unwrap_or(&self.hash);
        format!(
            "{}/{}{}",
            shard,
            self.hash,
            self.ext.as_deref().unwrap_or_default()
        )
    }
}

impl From<&MediaFile> for ProviderObject {
    fn from(file: &MediaFile) -> Self {
        Self::new(
            file.hash.clone(),
            file.ext.clone(),
            file.mime.clone(),
            file.size_bytes,
        )
    }
}

/// Result of a successful provider upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Public URL of the stored object
    pub url: String,
    /// Provider specific metadata to persist alongside the file row
    pub provider_metadata: Option<serde_json::Value>,
}

/// Physical storage backend for uploaded files.
///
/// A provider must implement at least one of [`upload_stream`](Self::upload_stream)
/// and [`upload`](Self::upload); callers pick the stream path whenever
/// [`supports_streaming`](Self::supports_streaming) returns `true`.
#[async_trait::async_trait]
pub trait MediaProvider: Send + Sync {
    /// Configured provider name, recorded on every file row.
    fn name(&self) -> &str;

    /// Whether [`upload_stream`](Self::upload_stream) is available.
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Store the object by streaming it from a local working file.
    async fn upload_stream(&self, object: &ProviderObject, source: &Path) -> FolioResult<StoredObject> {
        let _ = (object, source);
        Err(NotImplementedError::new(format!("{} does not support stream uploads", self.name())).into())
    }

    /// Store the object from an in-memory buffer.
    async fn upload(&self, object: &ProviderObject, data: Bytes) -> FolioResult<StoredObject> {
        let _ = (object, data);
        Err(NotImplementedError::new(format!("{} does not support buffer uploads", self.name())).into())
    }

    /// Read a stored object back by key, for providers that serve their own objects.
    async fn read(&self, key: &str) -> FolioResult<Bytes> {
        let _ = key;
        Err(NotImplementedError::new(format!("{} does not serve objects", self.name())).into())
    }

    /// Remove the physical object. Deleting a missing object succeeds.
    async fn delete(&self, object: &ProviderObject) -> FolioResult<()>;
}
