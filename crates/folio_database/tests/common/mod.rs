//! Shared fixtures for repository tests.

#![allow(dead_code)]

use folio_core::{AssetKind, Folder, MediaFile, NewFolder};
use folio_database::{Database, DatabaseConfig, FileRepository, FolderTree, NewMediaFile};
use tempfile::TempDir;

pub fn open_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let url = temp_dir.path().join("folio.db");
    let db = Database::open(&DatabaseConfig::new(url.to_string_lossy(), 4)).unwrap();
    (temp_dir, db)
}

pub async fn folder(tree: &FolderTree, name: &str, parent: Option<i32>) -> Folder {
    tree.create(
        NewFolder {
            name: name.to_string(),
            parent,
        },
        Some(1),
    )
    .await
    .unwrap()
}

pub fn new_file(name: &str, hash: &str, folder: Option<i32>) -> NewMediaFile {
    NewMediaFile {
        name: name.to_string(),
        hash: hash.to_string(),
        asset_kind: AssetKind::Image,
        ext: Some(".png".to_string()),
        mime: "image/png".to_string(),
        size_bytes: 128,
        width: Some(4),
        height: Some(4),
        url: format!("/uploads/{}/{}.png", &hash[0..2], hash),
        preview_url: None,
        provider: "local".to_string(),
        provider_metadata: None,
        folder,
        created_by: Some(1),
    }
}

pub async fn file(files: &FileRepository, name: &str, hash: &str, folder: Option<i32>) -> MediaFile {
    files.create(new_file(name, hash, folder)).await.unwrap()
}
