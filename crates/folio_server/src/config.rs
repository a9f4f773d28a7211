//! The `[server]` configuration section.

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_upload_bytes() -> u64 {
    256 * 1024 * 1024
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    bind: String,
    /// Largest accepted file part in bytes
    #[serde(default = "default_max_upload_bytes")]
    max_upload_bytes: u64,
    /// Bearer token every request must carry, if set
    #[serde(default)]
    token: Option<String>,
    /// Reject every non-read action
    #[serde(default)]
    read_only: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            token: None,
            read_only: false,
        }
    }
}

impl ServerConfig {
    /// Listen on `bind` with default limits.
    pub fn new(bind: impl Into<String>) -> Self {
        Self {
            bind: bind.into(),
            ..Self::default()
        }
    }

    /// Listen on another address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Require a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Forbid writes.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Cap the size of uploaded files.
    pub fn with_max_upload_bytes(mut self, max: u64) -> Self {
        self.max_upload_bytes = max;
        self
    }
}
