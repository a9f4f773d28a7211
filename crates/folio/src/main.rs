//! Folio CLI binary.
//!
//! - Serve the media library API
//! - Upload files with in-flight deduplication
//! - Manage folders and tags on a running server

use clap::Parser;
use folio::{FolderKey, FolioConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_library_command, run_server, upload_files};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = FolioConfig::load_from(cli.config.as_deref())?;
    init_logging(config.logging(), cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            run_server(&config, bind).await?;
        }

        Commands::Upload { paths, folder } => {
            let failed = upload_files(&config, paths, FolderKey::new(folder), cli.format).await?;
            if failed > 0 {
                std::process::exit(1);
            }
        }

        command => {
            handle_library_command(&config, command, cli.format).await?;
        }
    }

    Ok(())
}
