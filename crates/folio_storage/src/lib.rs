//! Pluggable upload providers for the Folio media library.
//!
//! The metadata service never touches bytes at rest directly. It hands each
//! uploaded file to a [`MediaProvider`], which stores it somewhere (local
//! disk, memory, an object store) and returns the public URL to record.
//!
//! # Features
//!
//! - **Content-addressable keys**: objects live at `{hash[0:2]}/{hash}{ext}`
//! - **Stream or buffer**: providers advertise which upload path they support
//! - **Atomic writes**: the local provider writes a temp file and renames it
//!
//! # Example
//!
//! ```rust
//! use folio_storage::{LocalProvider, MediaProvider, ProviderObject};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = LocalProvider::new("/tmp/folio-uploads", "/uploads")?;
//! let data = b"hello".to_vec();
//! let object = ProviderObject::for_bytes(&data, Some(".txt".to_string()), "text/plain");
//!
//! let stored = provider.upload(&object, data.into()).await?;
//! assert!(stored.url.starts_with("/uploads/"));
//! provider.delete(&object).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod local;
mod memory;
mod provider;

pub use config::{StorageConfig, provider_from_config};
pub use folio_error::{StorageError, StorageErrorKind};
pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use provider::{MediaProvider, ProviderObject, StoredObject, content_hash};
