//! Local filesystem provider.

use crate::{MediaProvider, ProviderObject, StoredObject};
use bytes::Bytes;
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Stores uploads on local disk in a content-addressable layout.
///
/// `{root}/{hash[0:2]}/{hash}{ext}`, served at
/// `{public_base_url}/{hash[0:2]}/{hash}{ext}`.
///
/// ```text
/// /var/lib/folio/uploads/
/// ├── 3a/
/// │   └── 3a7bd3e2360a3d...png
/// └── f0/
///     └── f00dfeed91c4ab...pdf
/// ```
///
/// Writes go to a uniquely named temp file in the shard directory and are
/// renamed into place, so readers never observe a partial object. Storing
/// identical content twice is a no-op.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
    public_base_url: String,
}

impl LocalProvider {
    /// Create a provider rooted at `root`, creating the directory if needed.
    #[tracing::instrument(skip(root, public_base_url))]
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> FolioResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        tracing::info!(root = %root.display(), base_url = %public_base_url, "Created local provider");
        Ok(Self {
            root,
            public_base_url,
        })
    }

    /// Root directory of the provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL of an object.
    pub fn url_for(&self, object: &ProviderObject) -> String {
        format!("{}/{}", self.public_base_url, object.key())
    }

    /// Filesystem location of an object.
    pub fn path_for(&self, object: &ProviderObject) -> PathBuf {
        self.root.join(object.key())
    }

    /// Resolve a storage key below the root, rejecting traversal.
    fn resolve(&self, key: &str) -> FolioResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let clean = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !clean || key.trim_start_matches('/').is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(key.to_string())).into());
        }
        Ok(self.root.join(relative))
    }

    async fn prepare(&self, path: &Path) -> FolioResult<Option<PathBuf>> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "Object already stored");
            return Ok(None);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        Ok(Some(path.with_extension(format!("{}.tmp", Uuid::new_v4()))))
    }

    async fn commit(&self, temp_path: &Path, path: &Path) -> FolioResult<()> {
        tokio::fs::rename(temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;
        Ok(())
    }

    fn stored(&self, object: &ProviderObject) -> StoredObject {
        StoredObject {
            url: self.url_for(object),
            provider_metadata: None,
        }
    }
}

#[async_trait::async_trait]
impl MediaProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    #[tracing::instrument(skip(self, object, source), fields(hash = %object.hash(), size = object.size_bytes()))]
    async fn upload_stream(&self, object: &ProviderObject, source: &Path) -> FolioResult<StoredObject> {
        let path = self.path_for(object);
        let Some(temp_path) = self.prepare(&path).await? else {
            return Ok(self.stored(object));
        };

        let copied = async {
            let mut reader = tokio::fs::File::open(source).await?;
            let mut writer = tokio::fs::File::create(&temp_path).await?;
            tokio::io::copy(&mut reader, &mut writer).await?;
            writer.sync_all().await
        }
        .await;

        if let Err(e) = copied {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{} from {}: {}",
                temp_path.display(),
                source.display(),
                e
            )))
            .into());
        }

        self.commit(&temp_path, &path).await?;
        tracing::info!(path = %path.display(), "Stored object from stream");
        Ok(self.stored(object))
    }

    #[tracing::instrument(skip(self, object, data), fields(hash = %object.hash(), size = data.len()))]
    async fn upload(&self, object: &ProviderObject, data: Bytes) -> FolioResult<StoredObject> {
        let path = self.path_for(object);
        let Some(temp_path) = self.prepare(&path).await? else {
            return Ok(self.stored(object));
        };

        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        self.commit(&temp_path, &path).await?;
        tracing::info!(path = %path.display(), "Stored object from buffer");
        Ok(self.stored(object))
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, key: &str) -> FolioResult<Bytes> {
        let path = self.resolve(key)?;
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(key.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        Ok(Bytes::from(data))
    }

    #[tracing::instrument(skip(self, object), fields(hash = %object.hash()))]
    async fn delete(&self, object: &ProviderObject) -> FolioResult<()> {
        let path = self.path_for(object);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Object already gone");
                Ok(())
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}
