//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Folio - self-hosted media library
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Self-hosted media library with a folder tree and deduplicated uploads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file used instead of ./folio.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the database and serve the HTTP API
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(long)]
        bind: Option<String>,
    },

    /// Upload files to a server
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Target folder path such as /1/2, or root
        #[arg(long, default_value = "root")]
        folder: String,
    },

    /// List files and folders in a folder
    Ls {
        /// Folder path such as /1/2, defaults to the root
        folder: Option<String>,
    },

    /// Create a folder
    Mkdir {
        /// Folder name
        name: String,

        /// Parent folder id, omitted for the root
        #[arg(long)]
        parent: Option<i32>,
    },

    /// Rename or move a folder
    Mv {
        /// Folder id
        id: i32,

        /// New parent folder id
        #[arg(long, conflicts_with = "root")]
        parent: Option<i32>,

        /// Move to the root
        #[arg(long)]
        root: bool,

        /// New name
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete folders with their contents
    Rm {
        /// Folder ids
        #[arg(required = true)]
        ids: Vec<i32>,
    },

    /// List tags
    Tags,

    /// Create a tag
    Tag {
        /// Tag name
        name: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
