//! Provider selection.

use crate::{LocalProvider, MediaProvider, MemoryProvider};
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// The `[storage]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Provider name (`local` or `memory`)
    #[serde(default = "default_provider")]
    provider: String,
    /// Root directory for the local provider
    #[serde(default = "default_root")]
    root: PathBuf,
    /// URL prefix under which stored objects are reachable
    #[serde(default = "default_public_base_url")]
    public_base_url: String,
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_public_base_url() -> String {
    "/uploads".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root: default_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl StorageConfig {
    /// Configuration for a named provider.
    pub fn new(
        provider: impl Into<String>,
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

/// Build the configured provider.
#[tracing::instrument(skip(config), fields(provider = %config.provider))]
pub fn provider_from_config(config: &StorageConfig) -> FolioResult<Arc<dyn MediaProvider>> {
    match config.provider.as_str() {
        "local" => Ok(Arc::new(LocalProvider::new(
            config.root.clone(),
            config.public_base_url.clone(),
        )?)),
        "memory" => Ok(Arc::new(MemoryProvider::new(config.public_base_url.clone()))),
        other => Err(StorageError::new(StorageErrorKind::UnknownProvider(other.to_string())).into()),
    }
}
