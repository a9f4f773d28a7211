//! SQLite persistence for the Folio media library.
//!
//! This crate owns the schema, the connection pool and the repositories
//! that read and write folders, files and tags. The [`FolderTree`] is the
//! only writer of materialized paths.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{FolderPatch, NewFolder};
//! use folio_database::{Database, FolderTree};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open_in_memory()?;
//! let tree = FolderTree::new(db);
//!
//! let photos = tree
//!     .create(NewFolder { name: "Photos".into(), parent: None }, None)
//!     .await?;
//! assert_eq!(photos.path, "/1");
//!
//! let renamed = tree.update(photos.id, FolderPatch::rename("Pictures"), None).await?;
//! assert_eq!(renamed.path, "/1");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod file_repository;
mod folder_tree;
mod models;
mod tag_repository;
mod validate;

/// Diesel table definitions.
pub mod schema;

pub use connection::{Database, DatabaseConfig, DbConnection, MIGRATIONS};
pub use file_repository::{FileRepository, NewMediaFile};
pub use folder_tree::FolderTree;
pub use tag_repository::TagRepository;
pub use validate::validate_name;
