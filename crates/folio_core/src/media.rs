//! Persisted media library records.

use crate::AssetKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stored asset.
///
/// `folder_path` always mirrors the current path of `folder` (or `/` when the
/// file lives in the root); it is rewritten by the folder tree whenever the
/// owning folder moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct MediaFile {
    /// Database identifier
    pub id: i32,
    /// Stable public identifier
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Content hash (hex SHA-256)
    pub hash: String,
    /// Asset category
    #[serde(rename = "assetType")]
    pub asset_kind: AssetKind,
    /// MIME type
    pub mime: String,
    /// File extension including the dot
    #[builder(default)]
    pub ext: Option<String>,
    /// Size in bytes
    #[serde(rename = "size")]
    pub size_bytes: i64,
    /// Pixel width for images
    #[builder(default)]
    pub width: Option<i32>,
    /// Pixel height for images
    #[builder(default)]
    pub height: Option<i32>,
    /// Public storage URL
    pub url: String,
    /// Optional preview URL
    #[builder(default)]
    pub preview_url: Option<String>,
    /// Name of the provider that stores the object
    pub provider: String,
    /// Provider specific metadata (JSON)
    #[builder(default)]
    pub provider_metadata: Option<serde_json::Value>,
    /// Alternative text for accessibility
    #[builder(default)]
    pub alternative_text: Option<String>,
    /// Caption
    #[builder(default)]
    pub caption: Option<String>,
    /// Owning folder id, `None` for the root
    #[builder(default)]
    pub folder: Option<i32>,
    /// Denormalized path of the owning folder
    pub folder_path: String,
    /// Associated tags
    #[builder(default)]
    #[serde(default)]
    pub tags: Vec<TagRef>,
    /// Creating user
    #[builder(default)]
    pub created_by: Option<i32>,
    /// Last editing user
    #[builder(default)]
    pub updated_by: Option<i32>,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Last update time
    pub updated_at: NaiveDateTime,
}

/// A node in the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Database identifier
    pub id: i32,
    /// Stable public identifier
    pub uuid: String,
    /// Display name, unique among siblings
    pub name: String,
    /// Monotonically assigned, never reused path component
    pub path_id: i32,
    /// Materialized path built from ancestor pathIds
    pub path: String,
    /// Parent folder id, `None` for root-level folders
    pub parent: Option<i32>,
    /// Creating user
    pub created_by: Option<i32>,
    /// Last editing user
    pub updated_by: Option<i32>,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Last update time
    pub updated_at: NaiveDateTime,
}

/// A folder together with its direct child and file counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    /// The folder itself
    #[serde(flatten)]
    pub folder: Folder,
    /// Number of direct child folders
    pub child_count: i64,
    /// Number of files directly inside
    pub file_count: i64,
}

/// A named label that can be attached to files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Database identifier
    pub id: i32,
    /// Stable public identifier
    pub uuid: String,
    /// Globally unique display name
    pub name: String,
    /// Creating user
    pub created_by: Option<i32>,
    /// Number of files carrying this tag
    pub file_count: i64,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Last update time
    pub updated_at: NaiveDateTime,
}

/// Lightweight tag reference embedded in file records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagRef {
    /// Tag uuid
    pub uuid: String,
    /// Tag name
    pub name: String,
}

/// Outcome of a folder subtree deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFoldersReport {
    /// The targeted folders as they were before deletion
    pub folders: Vec<Folder>,
    /// Number of folder rows deleted, descendants included
    pub total_folder_number: usize,
    /// Number of file rows deleted
    pub total_file_number: usize,
    /// The deleted files, for provider-side removal
    #[serde(skip)]
    pub files: Vec<MediaFile>,
}
