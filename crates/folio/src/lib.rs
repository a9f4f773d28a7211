//! Folio - a self-hosted media library.
//!
//! Folio stores uploaded assets in a content-addressed provider, organizes
//! them in a folder tree whose materialized paths survive renames, and ships
//! a client core that deduplicates in-flight uploads and tracks browsing
//! history.
//!
//! # Architecture
//!
//! - `folio_error` - Error types
//! - `folio_core` - Data model and folder path helpers
//! - `folio_storage` - Storage providers
//! - `folio_database` - SQLite persistence and the folder tree
//! - `folio_server` - HTTP API
//! - `folio_client` - Upload coordinator, navigation and HTTP client
//!
//! This crate re-exports everything for convenience and adds the layered
//! configuration used by the `folio` binary.

mod config;
mod telemetry;

pub use config::{FolioConfig, LogFormat, LoggingConfig};
pub use telemetry::init_logging;

pub use folio_client::{
    ClientConfig, Finder, HistorySync, HostRouter, HttpTransport, LibraryApi, Listing,
    ListingEntry, NavigationState, Notice, Selection, SourceContent, UploadCoordinator,
    UploadEvent, UploadHandle, UploadRegistry, UploadSource, UploadTransport,
};
pub use folio_core::*;
pub use folio_database::{Database, DatabaseConfig, FileRepository, FolderTree, TagRepository};
pub use folio_error::*;
pub use folio_server::{AppState, MediaLibrary, ServerConfig, bind, router, serve};
pub use folio_storage::{
    LocalProvider, MediaProvider, MemoryProvider, StorageConfig, provider_from_config,
};
