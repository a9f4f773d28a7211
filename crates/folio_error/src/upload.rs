//! Client-side upload pipeline errors.

/// Conditions that end an upload before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadErrorKind {
    /// Identical content is already in flight for the folder
    #[display("Upload of {} into '{}' is already in progress", hash, folder)]
    Duplicate {
        /// Folder key the upload targeted
        folder: String,
        /// Content hash of the rejected file
        hash: String,
    },
    /// Network or provider failure during the transfer
    #[display("Transfer failed: {}", _0)]
    TransferFailed(String),
    /// The transfer was aborted by the user
    #[display("Transfer cancelled")]
    Cancelled,
    /// A local preview could not be produced
    #[display("Preview generation failed: {}", _0)]
    PreviewFailed(String),
    /// The file could not be read for hashing
    #[display("Failed to hash file: {}", _0)]
    Hashing(String),
}

kind_error!(
    /// An upload that ended before it was persisted.
    ///
    /// ```
    /// use folio_error::{UploadError, UploadErrorKind};
    ///
    /// let err = UploadError::new(UploadErrorKind::Cancelled);
    /// assert!(format!("{}", err).contains("cancelled"));
    /// ```
    UploadError(UploadErrorKind),
    "Upload Error"
);
