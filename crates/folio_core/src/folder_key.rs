//! Client-side folder keys.

use serde::{Deserialize, Serialize};

/// Wire and registry sentinel for the root folder.
pub const ROOT_FOLDER_KEY: &str = "root";

/// Identifies a folder on the client and on the upload wire.
///
/// A key is either the root sentinel or the folder's materialized path
/// (`/1/4`). Keys are normalized on construction so that `""`, `"/"` and
/// `"root"` all name the root, and `"1/4/"` becomes `"/1/4"`.
///
/// # Examples
///
/// ```
/// use folio_core::FolderKey;
///
/// assert!(FolderKey::new("/").is_root());
/// assert_eq!(FolderKey::new("1/4/").as_str(), "/1/4");
/// assert_eq!(FolderKey::root().folder_path(), "/");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(from = "String", into = "String")]
pub struct FolderKey(String);

impl FolderKey {
    /// Create a normalized folder key.
    pub fn new(key: impl AsRef<str>) -> Self {
        let trimmed = key.as_ref().trim().trim_matches('/');
        if trimmed.is_empty() || trimmed == ROOT_FOLDER_KEY {
            Self::root()
        } else {
            Self(format!("/{}", trimmed))
        }
    }

    /// The root folder key.
    pub fn root() -> Self {
        Self(ROOT_FOLDER_KEY.to_string())
    }

    /// Key for a persisted folder path (`/` maps to the root sentinel).
    pub fn from_folder_path(path: &str) -> Self {
        Self::new(path)
    }

    /// Whether this key names the root folder.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_FOLDER_KEY
    }

    /// The raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The materialized path this key stands for.
    pub fn folder_path(&self) -> &str {
        if self.is_root() { "/" } else { &self.0 }
    }

    /// The key as a URL path tail (`1/4`), or `None` for the root.
    pub fn route_segment(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(self.0.trim_start_matches('/'))
        }
    }
}

impl Default for FolderKey {
    fn default() -> Self {
        Self::root()
    }
}

impl From<String> for FolderKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for FolderKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<FolderKey> for String {
    fn from(key: FolderKey) -> Self {
        key.0
    }
}
