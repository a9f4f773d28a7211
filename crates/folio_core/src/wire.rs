//! Request and response bodies shared by the HTTP server and client.

use crate::FilePatch;
use serde::{Deserialize, Serialize};

/// Body of every non-success response.
///
/// # Examples
///
/// ```
/// use folio_core::ErrorEnvelope;
///
/// let envelope = ErrorEnvelope::new(404, "NotFound", "folder 7");
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["status"], 404);
/// assert!(json["data"].is_null());
/// assert_eq!(json["error"]["name"], "NotFound");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status code
    pub status: u16,
    /// Always `null` for errors
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// What went wrong
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    /// Build an envelope.
    pub fn new(status: u16, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            data: None,
            error: ErrorDetail {
                name: name.into(),
                message: message.into(),
            },
        }
    }
}

/// Machine-readable error name and human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error category, e.g. `NotFound` or `DuplicateFolderName`
    pub name: String,
    /// Description
    pub message: String,
}

/// One uuid or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single uuid
    One(String),
    /// Several uuids
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(uuid) => vec![uuid],
            OneOrMany::Many(uuids) => uuids,
        }
    }
}

/// Body of `PATCH /files`.
///
/// # Examples
///
/// ```
/// use folio_core::FileAction;
///
/// let action: FileAction =
///     serde_json::from_str(r#"{"action":"delete","uuid":["a","b"]}"#).unwrap();
/// assert!(matches!(action, FileAction::Delete { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum FileAction {
    /// Delete one or more files
    Delete {
        /// Target uuids
        uuid: OneOrMany,
    },
    /// Edit one file
    Update {
        /// Target uuid
        uuid: String,
        /// Changes
        patch: FilePatch,
    },
}

/// Body of `DELETE /folders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFolders {
    /// Folder ids to delete with their subtrees
    pub ids: Vec<i32>,
}
