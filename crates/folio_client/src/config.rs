//! Client configuration.

use crate::preview::DEFAULT_PREVIEW_EDGE;
use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_preview_edge() -> u32 {
    DEFAULT_PREVIEW_EDGE
}

fn default_chunk_size() -> usize {
    64 * 1024
}

/// Settings for talking to a Folio server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ClientConfig {
    /// Server base URL
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    token: Option<String>,
    /// Preview square edge in pixels
    #[serde(default = "default_preview_edge")]
    preview_edge: u32,
    /// Upload body chunk size, which sets progress granularity
    #[serde(default = "default_chunk_size")]
    chunk_size: usize,
}

impl ClientConfig {
    /// Configuration for a server at `base_url` with defaults elsewhere.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            preview_edge: default_preview_edge(),
            chunk_size: default_chunk_size(),
        }
    }
}
