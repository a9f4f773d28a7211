//! Provider failures.

/// What a provider could not do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StorageErrorKind {
    /// The shard or root directory could not be created
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Writing or renaming the object failed
    #[display("Failed to write object: {}", _0)]
    FileWrite(String),
    /// Reading a working file or stored object failed
    #[display("Failed to read object: {}", _0)]
    FileRead(String),
    /// No object is stored under the key
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// A key escapes the provider root or is malformed
    #[display("Invalid storage key: {}", _0)]
    InvalidPath(String),
    /// No provider is registered under the configured name
    #[display("Unknown provider: {}", _0)]
    UnknownProvider(String),
}

kind_error!(
    /// A provider failure.
    ///
    /// ```
    /// use folio_error::{StorageError, StorageErrorKind};
    ///
    /// let err = StorageError::new(StorageErrorKind::NotFound("ab/abcdef.png".to_string()));
    /// assert!(err.to_string().contains("Object not found: ab/abcdef.png"));
    /// ```
    StorageError(StorageErrorKind),
    "Storage Error"
);
