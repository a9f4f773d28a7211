//! Layered configuration for the `folio` binary.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (`include_str!` of `folio.toml`)
//! - `~/.config/folio/folio.toml`
//! - `./folio.toml`, or the file passed with `--config`
//! - `FOLIO__SECTION__KEY` environment variables

use config::{Config, Environment, File, FileFormat};
use folio_client::ClientConfig;
use folio_database::DatabaseConfig;
use folio_error::{ConfigError, FolioError, FolioResult};
use folio_server::ServerConfig;
use folio_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../folio.toml");

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// The `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FolioConfig {
    /// HTTP server settings
    #[serde(default)]
    server: ServerConfig,
    /// SQLite settings
    #[serde(default)]
    database: DatabaseConfig,
    /// Provider settings
    #[serde(default)]
    storage: StorageConfig,
    /// Settings for commands that talk to a server
    #[serde(default)]
    client: ClientConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl FolioConfig {
    /// Load with the standard precedence.
    pub fn load() -> FolioResult<Self> {
        Self::load_from(None)
    }

    /// Load, replacing `./folio.toml` with `path` when given.
    pub fn load_from(path: Option<&Path>) -> FolioResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment.
    #[instrument(skip(env))]
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> FolioResult<Self> {
        debug!("Loading configuration with precedence: env > local file > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/folio/folio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("folio").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .map_err(|e| {
                FolioError::from(ConfigError::new(format!(
                    "Failed to load configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FolioError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
