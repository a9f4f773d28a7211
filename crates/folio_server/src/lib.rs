//! HTTP surface of the Folio media library.
//!
//! The server accepts multipart uploads, verifies the client's content hash
//! against the received bytes, hands them to the configured
//! [`folio_storage::MediaProvider`] and records metadata through
//! `folio_database`. Folder, file and tag management are exposed as JSON
//! endpoints.
//!
//! # Example
//!
//! ```no_run
//! use folio_database::{Database, DatabaseConfig};
//! use folio_server::{AppState, MediaLibrary, ServerConfig, bind, serve};
//! use folio_storage::MemoryProvider;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> folio_error::FolioResult<()> {
//! let db = Database::open(&DatabaseConfig::new("folio.db", 4))?;
//! let library = MediaLibrary::new(db, Arc::new(MemoryProvider::new("/uploads")));
//! let config = ServerConfig::new("127.0.0.1:8080");
//! let listener = bind(&config).await?;
//! serve(listener, AppState::new(library, &config), CancellationToken::new()).await
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod intake;
mod library;
mod object_locks;
mod response;
mod routes;
mod server;

pub use auth::{Action, Authorizer, Principal, TokenAuthorizer, USER_HEADER};
pub use config::ServerConfig;
pub use intake::{StagedUpload, extension_for, stage_upload};
pub use library::{ListOptions, MediaLibrary};
pub use response::{ApiError, classify};
pub use routes::{AppState, router};
pub use server::{bind, serve};
