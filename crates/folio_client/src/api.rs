//! Metadata operations the finder needs from the library.

use async_trait::async_trait;
use folio_core::{
    DeleteFoldersReport, Folder, FolderKey, FolderPatch, FolderSummary, MediaFile, NewFolder,
    NewTag, Tag,
};
use folio_error::FolioResult;

/// Read and edit library metadata.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Persisted files directly inside a folder.
    async fn list_files(&self, folder: &FolderKey) -> FolioResult<Vec<MediaFile>>;

    /// Child folders of a folder, with counts.
    async fn list_folders(&self, parent: &FolderKey) -> FolioResult<Vec<FolderSummary>>;

    /// Create a folder.
    async fn create_folder(&self, folder: NewFolder) -> FolioResult<Folder>;

    /// Rename and/or move a folder.
    async fn update_folder(&self, id: i32, patch: FolderPatch) -> FolioResult<Folder>;

    /// Delete folders with their subtrees and files.
    async fn delete_folders(&self, ids: Vec<i32>) -> FolioResult<DeleteFoldersReport>;

    /// All tags with their file counts.
    async fn list_tags(&self) -> FolioResult<Vec<Tag>>;

    /// Create a tag.
    async fn create_tag(&self, tag: NewTag) -> FolioResult<Tag>;
}
