//! In-flight upload records and upload wire fields.

use crate::{AssetKind, FolderKey};
use serde::{Deserialize, Serialize};

/// Multipart field carrying the binary content.
pub const FIELD_FILES: &str = "files";
/// Multipart field carrying the content hash.
pub const FIELD_HASH: &str = "hash";
/// Multipart field carrying the asset kind.
pub const FIELD_ASSET_TYPE: &str = "assetType";
/// Multipart field carrying the target folder key.
pub const FIELD_FOLDER: &str = "folder";

/// Lifecycle of an in-flight upload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Registered, waiting for preview or transfer
    #[display("queued")]
    Queued,
    /// Transfer in progress
    #[display("uploading")]
    Uploading,
    /// Persisted by the server, awaiting the next listing fetch
    #[display("complete")]
    Complete,
}

/// A file mid-transfer, keyed by folder and content hash.
///
/// # Examples
///
/// ```
/// use folio_core::{AssetKind, FolderKey, UploadItem, UploadStatus};
///
/// let item = UploadItem::queued("abc123", "a.png", 1024, "image/png", FolderKey::root());
/// assert_eq!(item.status, UploadStatus::Queued);
/// assert_eq!(item.asset_kind, AssetKind::Image);
/// assert!(item.preview_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadItem {
    /// Content hash, unique per folder while in flight
    pub hash: String,
    /// Display name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Asset category derived from the MIME type
    #[serde(rename = "assetType")]
    pub asset_kind: AssetKind,
    /// Lifecycle status
    pub status: UploadStatus,
    /// Local preview, populated asynchronously
    pub preview_url: Option<String>,
    /// Transfer progress in percent
    pub progress: Option<u8>,
    /// Folder the upload targets
    pub folder: FolderKey,
}

impl UploadItem {
    /// Create a freshly registered item.
    pub fn queued(
        hash: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        mime: &str,
        folder: FolderKey,
    ) -> Self {
        Self {
            hash: hash.into(),
            name: name.into(),
            size,
            asset_kind: AssetKind::from_mime(mime),
            status: UploadStatus::Queued,
            preview_url: None,
            progress: None,
            folder,
        }
    }
}

/// Metadata sent alongside the binary content of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileInfo {
    /// Content hash
    pub hash: String,
    /// Asset category
    #[serde(rename = "assetType")]
    pub asset_kind: AssetKind,
    /// Target folder
    pub folder: FolderKey,
}
