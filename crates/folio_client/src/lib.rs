//! Client side of the Folio media library.
//!
//! This crate carries everything a finder front end needs besides rendering:
//!
//! - [`hashing`] and [`preview`] helpers for dropped files
//! - the [`UploadTransport`] and [`LibraryApi`] seams, implemented over HTTP
//!   by [`HttpTransport`]
//! - the [`UploadCoordinator`], which deduplicates, tracks and cancels
//!   concurrent uploads per folder
//! - the [`NavigationState`] history machine and its [`HistorySync`] with a
//!   host router
//! - the [`Finder`], which ties navigation, listing fetches and upload
//!   reconciliation together
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_client::{HttpTransport, UploadCoordinator, UploadSource};
//! use folio_core::FolderKey;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new("http://127.0.0.1:8080", None)?);
//! let coordinator = UploadCoordinator::new(transport);
//!
//! let source = UploadSource::from_path("photo.png").await?;
//! let handle = coordinator.start_upload(source, FolderKey::root());
//! let file = handle.result().await?;
//! println!("stored at {}", file.url);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod coordinator;
mod events;
mod finder;
pub mod hashing;
mod http;
mod navigation;
pub mod preview;
mod registry;
mod router;
mod source;
mod transport;

pub use api::LibraryApi;
pub use config::ClientConfig;
pub use coordinator::{UploadCoordinator, UploadHandle};
pub use events::{Notice, UploadEvent};
pub use finder::{Finder, Listing, ListingEntry};
pub use http::HttpTransport;
pub use navigation::{NavigationState, Selection};
pub use registry::{RegistrationId, UploadRegistry};
pub use router::{HistorySync, HostRouter};
pub use source::{SourceContent, UploadSource};
pub use transport::{ProgressFn, UploadTransport};
