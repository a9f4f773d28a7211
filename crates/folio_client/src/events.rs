//! Upload lifecycle events and user-facing notices.

use folio_core::{FolderKey, MediaFile, UploadItem};

/// State changes published by the upload coordinator.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A new item entered the in-flight registry
    Registered(UploadItem),
    /// A local preview was attached to an item
    PreviewReady {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
        /// `data:` URL of the preview
        preview_url: String,
    },
    /// Transfer progress changed
    Progress {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
        /// Percentage sent
        percent: u8,
    },
    /// The server persisted the file
    Completed {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
        /// Persisted record
        file: Box<MediaFile>,
    },
    /// The transfer failed and the item was purged
    Failed {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
        /// Failure description
        message: String,
    },
    /// The user cancelled the transfer and the item was purged
    Cancelled {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
    },
    /// Identical content was already in flight for the folder
    Rejected {
        /// Folder of the upload
        folder: FolderKey,
        /// Content hash of the upload
        hash: String,
    },
}

/// Messages meant for the person driving the client.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Notice {
    /// Something went wrong
    #[display("error: {}", _0)]
    Error(String),
    /// Neutral information
    #[display("{}", _0)]
    Info(String),
}
