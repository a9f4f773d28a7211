//! The media library service: metadata repositories plus the provider.

use crate::StagedUpload;
use crate::extension_for;
use crate::object_locks::ObjectLocks;
use bytes::Bytes;
use folio_core::{
    AssetKind, DeleteFoldersReport, FileQuery, FileQueryBuilder, FolderFilter, FolderKey,
    MediaFile, SortDirection, SortField,
};
use folio_database::{Database, FileRepository, FolderTree, NewMediaFile, TagRepository};
use folio_error::{FolioResult, LibraryError, LibraryErrorKind, StorageError, StorageErrorKind};
use folio_storage::{MediaProvider, ProviderObject, StoredObject};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Listing options accepted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// 1-based page
    pub page: Option<i64>,
    /// Page size
    pub page_size: Option<i64>,
    /// Sort column
    pub sort: Option<SortField>,
    /// Sort direction
    pub direction: Option<SortDirection>,
}

/// Everything the HTTP layer needs to serve the library.
#[derive(Clone)]
pub struct MediaLibrary {
    files: FileRepository,
    folders: FolderTree,
    tags: TagRepository,
    provider: Arc<dyn MediaProvider>,
    objects: ObjectLocks,
}

impl std::fmt::Debug for MediaLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaLibrary")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl MediaLibrary {
    /// Build the service over an open database and a provider.
    pub fn new(db: Database, provider: Arc<dyn MediaProvider>) -> Self {
        Self {
            files: FileRepository::new(db.clone()),
            folders: FolderTree::new(db.clone()),
            tags: TagRepository::new(db),
            provider,
            objects: ObjectLocks::default(),
        }
    }

    /// File metadata.
    pub fn files(&self) -> &FileRepository {
        &self.files
    }

    /// The folder tree.
    pub fn folders(&self) -> &FolderTree {
        &self.folders
    }

    /// Tags.
    pub fn tags(&self) -> &TagRepository {
        &self.tags
    }

    /// The configured provider.
    pub fn provider(&self) -> &Arc<dyn MediaProvider> {
        &self.provider
    }

    /// Folder id for a client folder key, `None` for the root.
    pub async fn resolve_folder(&self, key: &FolderKey) -> FolioResult<Option<i32>> {
        if key.is_root() {
            return Ok(None);
        }
        let folder = self.folders.find_by_path(key.folder_path().to_string()).await?;
        Ok(Some(folder.id))
    }

    /// One page of files in the folder named by `key`.
    #[instrument(skip(self))]
    pub async fn list_files(&self, key: &FolderKey, options: ListOptions) -> FolioResult<Vec<MediaFile>> {
        let folder = FolderFilter::from(self.resolve_folder(key).await?);
        let defaults = FileQuery::in_folder(folder);
        let query = FileQueryBuilder::default()
            .folder(folder)
            .page(options.page.unwrap_or(*defaults.page()))
            .page_size(options.page_size.unwrap_or(*defaults.page_size()))
            .sort(options.sort.unwrap_or_default())
            .direction(options.direction.unwrap_or_default())
            .build()
            .map_err(|e| LibraryError::new(LibraryErrorKind::InvalidRequest(e.to_string())))?;
        self.files.find(query).await
    }

    /// Verify, store and record a staged upload.
    #[instrument(skip(self, staged), fields(name = %staged.name(), folder = %staged.folder(), hash = %staged.computed_hash()))]
    pub async fn upload(&self, staged: StagedUpload, user: Option<i32>) -> FolioResult<MediaFile> {
        if let Some(claimed) = staged.claimed_hash()
            && claimed != staged.computed_hash()
        {
            return Err(LibraryError::new(LibraryErrorKind::HashMismatch {
                expected: claimed.clone(),
                actual: staged.computed_hash().clone(),
            })
            .into());
        }

        let folder = self.resolve_folder(staged.folder()).await?;
        let asset_kind = staged
            .asset_kind()
            .unwrap_or_else(|| AssetKind::from_mime(staged.mime()));
        let ext = extension_for(staged.name(), staged.mime());
        let (width, height) = match asset_kind {
            AssetKind::Image => image_dimensions(staged.path().clone()).await,
            _ => (None, None),
        };

        let object = ProviderObject::new(
            staged.computed_hash().clone(),
            ext.clone(),
            staged.mime().clone(),
            *staged.size() as i64,
        );
        // Held until the row exists so cleanup sees the new reference
        let _object = self.objects.lock(staged.computed_hash()).await;
        let stored = self.store(&object, &staged).await?;

        let file = self
            .files
            .create(NewMediaFile {
                name: staged.name().clone(),
                hash: staged.computed_hash().clone(),
                asset_kind,
                ext,
                mime: staged.mime().clone(),
                size_bytes: *staged.size() as i64,
                width,
                height,
                url: stored.url,
                preview_url: None,
                provider: self.provider.name().to_string(),
                provider_metadata: stored.provider_metadata,
                folder,
                created_by: user,
            })
            .await?;

        info!(uuid = %file.uuid, url = %file.url, "Upload stored");
        Ok(file)
    }

    async fn store(&self, object: &ProviderObject, staged: &StagedUpload) -> FolioResult<StoredObject> {
        if self.provider.supports_streaming() {
            debug!(provider = self.provider.name(), "Using stream upload");
            return self.provider.upload_stream(object, staged.path()).await;
        }

        debug!(provider = self.provider.name(), "Using buffer upload");
        let data = tokio::fs::read(staged.path()).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                staged.path().display(),
                e
            )))
        })?;
        self.provider.upload(object, Bytes::from(data)).await
    }

    /// Delete files and then their stored objects.
    #[instrument(skip(self), fields(count = uuids.len()))]
    pub async fn delete_files(&self, uuids: Vec<String>) -> FolioResult<Vec<MediaFile>> {
        let removed = self.files.delete(uuids).await?;
        self.remove_objects(removed.clone()).await;
        Ok(removed)
    }

    /// Delete folder subtrees, their files and then the stored objects.
    #[instrument(skip(self))]
    pub async fn delete_folders(&self, ids: Vec<i32>) -> FolioResult<DeleteFoldersReport> {
        let report = self.folders.delete(ids).await?;
        self.remove_objects(report.files.clone()).await;
        Ok(report)
    }

    /// Best-effort removal of objects no remaining file references.
    ///
    /// Each object is rechecked under its hash lock, so an upload that reused
    /// the object after the rows were deleted keeps it.
    async fn remove_objects(&self, removed: Vec<MediaFile>) {
        let mut seen = HashSet::new();
        let objects = removed
            .into_iter()
            .filter(|file| seen.insert((file.hash.clone(), file.ext.clone())));
        for file in objects {
            let _object = self.objects.lock(&file.hash).await;
            let orphaned = match self.files.orphaned(vec![file]).await {
                Ok(orphaned) => orphaned,
                Err(e) => {
                    warn!(error = %e, "Could not determine orphaned objects");
                    continue;
                }
            };
            for file in orphaned {
                if let Err(e) = self.provider.delete(&ProviderObject::from(&file)).await {
                    warn!(hash = %file.hash, error = %e, "Failed to delete stored object");
                }
            }
        }
    }

    /// Read a stored object back for serving.
    pub async fn read_object(&self, key: &str) -> FolioResult<Bytes> {
        self.provider.read(key).await
    }
}

async fn image_dimensions(path: PathBuf) -> (Option<i32>, Option<i32>) {
    let dimensions = tokio::task::spawn_blocking(move || {
        image::ImageReader::open(&path)
            .ok()?
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    })
    .await
    .ok()
    .flatten();

    match dimensions {
        Some((width, height)) => (i32::try_from(width).ok(), i32::try_from(height).ok()),
        None => {
            debug!("Could not read image dimensions");
            (None, None)
        }
    }
}
