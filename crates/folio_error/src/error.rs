//! The aggregate error returned by every fallible Folio operation.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{
    ConfigError, HttpError, JsonError, LibraryError, LibraryErrorKind, NotImplementedError,
    StorageError, UploadError, UploadErrorKind,
};

/// Every error condition the Folio crates can produce.
///
/// ```
/// use folio_error::{FolioError, StorageError, StorageErrorKind};
///
/// let err: FolioError = StorageError::new(StorageErrorKind::NotFound("ab/ab12.png".into())).into();
/// assert!(err.is_not_found());
/// assert!(err.to_string().contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FolioErrorKind {
    /// Request or response failure
    #[from(HttpError)]
    Http(HttpError),
    /// Malformed JSON
    #[from(JsonError)]
    Json(JsonError),
    /// Unloadable configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// Feature not implemented by a backend
    #[from(NotImplementedError)]
    NotImplemented(NotImplementedError),
    /// Provider storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Upload pipeline error
    #[from(UploadError)]
    Upload(UploadError),
    /// Metadata validation or lookup error
    #[from(LibraryError)]
    Library(LibraryError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

#[cfg(feature = "database")]
impl From<diesel::result::Error> for FolioErrorKind {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        FolioErrorKind::Database(DatabaseError::from(err))
    }
}

/// Folio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use folio_error::{FolioResult, UploadError, UploadErrorKind};
///
/// fn upload() -> FolioResult<()> {
///     Err(UploadError::new(UploadErrorKind::Cancelled))?
/// }
///
/// assert!(upload().unwrap_err().is_cancelled());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Folio Error: {}", _0)]
pub struct FolioError(Box<FolioErrorKind>);

impl FolioError {
    /// Box a kind.
    pub fn new(kind: FolioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// The underlying condition.
    pub fn kind(&self) -> &FolioErrorKind {
        &self.0
    }

    /// The library error kind, if this is a library error.
    pub fn library_kind(&self) -> Option<&LibraryErrorKind> {
        match self.kind() {
            FolioErrorKind::Library(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// The upload error kind, if this is an upload error.
    pub fn upload_kind(&self) -> Option<&UploadErrorKind> {
        match self.kind() {
            FolioErrorKind::Upload(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Whether the error reports a missing record or object.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            FolioErrorKind::Library(err) => {
                matches!(err.kind, LibraryErrorKind::NotFound(_))
            }
            FolioErrorKind::Storage(err) => {
                matches!(err.kind, crate::StorageErrorKind::NotFound(_))
            }
            #[cfg(feature = "database")]
            FolioErrorKind::Database(err) => {
                matches!(err.kind, crate::DatabaseErrorKind::NotFound)
            }
            FolioErrorKind::Http(err) => err.status == Some(404),
            _ => false,
        }
    }

    /// Whether the error is an in-flight duplicate upload rejection.
    pub fn is_duplicate_upload(&self) -> bool {
        matches!(self.upload_kind(), Some(UploadErrorKind::Duplicate { .. }))
    }

    /// Whether the error is a user-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.upload_kind(), Some(UploadErrorKind::Cancelled))
    }
}

impl<T> From<T> for FolioError
where
    T: Into<FolioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;
