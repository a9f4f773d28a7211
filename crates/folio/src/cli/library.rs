//! Folder and tag commands run against a server.

use super::{Commands, OutputFormat};
use folio::{
    FolderKey, FolderPatch, FolioConfig, FolioResult, HttpTransport, JsonError, LibraryApi,
    NewFolder, NewTag,
};
use serde::Serialize;

/// Run a folder or tag command.
pub async fn handle_library_command(
    config: &FolioConfig,
    command: Commands,
    format: OutputFormat,
) -> FolioResult<()> {
    let api = HttpTransport::from_config(config.client())?;

    match command {
        Commands::Ls { folder } => {
            let folder = folder.map(FolderKey::new).unwrap_or_default();
            let folders = api.list_folders(&folder).await?;
            let files = api.list_files(&folder).await?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "folders": folders,
                    "files": files,
                }))?,
                OutputFormat::Human => {
                    for summary in &folders {
                        println!(
                            "{:>6}  {:<30} {}  ({} folders, {} files)",
                            summary.folder.id,
                            format!("{}/", summary.folder.name),
                            summary.folder.path,
                            summary.child_count,
                            summary.file_count
                        );
                    }
                    for file in &files {
                        println!("{:>6}  {:<30} {:>10}  {}", "", file.name, file.size_bytes, file.url);
                    }
                    println!("Total: {} folders, {} files", folders.len(), files.len());
                }
            }
        }

        Commands::Mkdir { name, parent } => {
            let folder = api.create_folder(NewFolder { name, parent }).await?;
            match format {
                OutputFormat::Json => print_json(&folder)?,
                OutputFormat::Human => println!("created {} {} ({})", folder.id, folder.name, folder.path),
            }
        }

        Commands::Mv {
            id,
            parent,
            root,
            name,
        } => {
            let parent = match (parent, root) {
                (Some(parent), _) => Some(Some(parent)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let folder = api.update_folder(id, FolderPatch { name, parent }).await?;
            match format {
                OutputFormat::Json => print_json(&folder)?,
                OutputFormat::Human => println!("moved {} {} -> {}", folder.id, folder.name, folder.path),
            }
        }

        Commands::Rm { ids } => {
            let report = api.delete_folders(ids).await?;
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Human => println!(
                    "deleted {} folders and {} files",
                    report.total_folder_number, report.total_file_number
                ),
            }
        }

        Commands::Tags => {
            let tags = api.list_tags().await?;
            match format {
                OutputFormat::Json => print_json(&tags)?,
                OutputFormat::Human => {
                    for tag in &tags {
                        println!("{:<30} {}", tag.name, tag.file_count);
                    }
                }
            }
        }

        Commands::Tag { name } => {
            let tag = api.create_tag(NewTag { name, files: None }).await?;
            match format {
                OutputFormat::Json => print_json(&tag)?,
                OutputFormat::Human => println!("created tag {} ({})", tag.name, tag.uuid),
            }
        }

        Commands::Serve { .. } | Commands::Upload { .. } => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> FolioResult<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
