//! Media library validation and lookup errors.

/// Failures raised by the metadata service and the folder tree.
///
/// Validation kinds are always raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LibraryErrorKind {
    /// A sibling folder already uses this name
    #[display("A folder named '{}' already exists here", _0)]
    DuplicateFolderName(String),
    /// A tag already uses this name
    #[display("A tag named '{}' already exists", _0)]
    DuplicateTagName(String),
    /// The referenced parent folder does not exist
    #[display("Parent folder {} does not exist", _0)]
    ParentFolderNotFound(i32),
    /// The cascading path rewrite failed and was rolled back
    #[display("Folder move failed and was rolled back: {}", _0)]
    FolderMoveFailed(String),
    /// The requested move would create a cycle
    #[display("Invalid move: {}", _0)]
    InvalidMove(String),
    /// A folder or tag name failed validation
    #[display("Invalid name: {}", _0)]
    InvalidName(String),
    /// Generic request validation failure
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Uploaded content does not match the declared hash
    #[display("Content hash mismatch: expected {}, got {}", expected, actual)]
    HashMismatch {
        /// Hash declared by the client
        expected: String,
        /// Hash computed by the server
        actual: String,
    },
    /// The addressed record does not exist
    #[display("{} not found", _0)]
    NotFound(String),
    /// The caller lacks the permission for this action
    #[display("Forbidden: {}", _0)]
    Forbidden(String),
}

kind_error!(
    /// A metadata validation or lookup failure.
    ///
    /// ```
    /// use folio_error::{LibraryError, LibraryErrorKind};
    ///
    /// let err = LibraryError::new(LibraryErrorKind::DuplicateTagName("travel".to_string()));
    /// assert!(format!("{}", err).contains("travel"));
    /// ```
    LibraryError(LibraryErrorKind),
    "Library Error"
);
