//! Command-line interface module.

mod commands;
mod library;
mod serve;
mod upload;

pub use commands::{Cli, Commands, OutputFormat};
pub use library::handle_library_command;
pub use serve::run_server;
pub use upload::upload_files;
