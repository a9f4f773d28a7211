//! Error types for the Folio media library.
//!
//! This crate provides the foundation error types used throughout the Folio workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use folio_error::{FolioResult, LibraryError, LibraryErrorKind};
//!
//! fn find_folder() -> FolioResult<String> {
//!     Err(LibraryError::new(LibraryErrorKind::NotFound("folder 7".to_string())))?
//! }
//!
//! let err = find_folder().unwrap_err();
//! assert!(err.is_not_found());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod located;

#[cfg(feature = "database")]
mod database;
mod error;
mod http;
mod library;
mod storage;
mod upload;

#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{FolioError, FolioErrorKind, FolioResult};
pub use http::HttpError;
pub use library::{LibraryError, LibraryErrorKind};
pub use located::{ConfigError, JsonError, NotImplementedError};
pub use storage::{StorageError, StorageErrorKind};
pub use upload::{UploadError, UploadErrorKind};
