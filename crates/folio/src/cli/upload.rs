//! The `upload` command.

use super::OutputFormat;
use folio::{
    FolderKey, FolioConfig, FolioResult, HttpTransport, JsonError, UploadCoordinator, UploadSource,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Upload `paths` into `folder`, cancelling everything in flight on Ctrl-C.
///
/// Returns the number of uploads that did not complete.
pub async fn upload_files(
    config: &FolioConfig,
    paths: Vec<PathBuf>,
    folder: FolderKey,
    format: OutputFormat,
) -> FolioResult<usize> {
    let transport = Arc::new(HttpTransport::from_config(config.client())?);
    let coordinator =
        UploadCoordinator::new(transport).with_preview_edge(*config.client().preview_edge());

    let mut failed = 0;
    let mut started = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadSource::from_path(&path).await {
            Ok(source) => {
                let name = source.name().clone();
                started.push((name, coordinator.start_upload(source, folder.clone())));
            }
            Err(e) => {
                failed += 1;
                report(format, &path.display().to_string(), Err(e.to_string()))?;
            }
        }
    }

    let tokens: Vec<_> = started
        .iter()
        .map(|(_, handle)| handle.cancellation_token())
        .collect();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(count = tokens.len(), "Cancelling uploads");
            for token in tokens {
                token.cancel();
            }
        }
    });

    for (name, handle) in started {
        match handle.result().await {
            Ok(file) => report(format, &name, Ok(serde_json::to_value(&file).map_err(json_error)?))?,
            Err(e) => {
                failed += 1;
                report(format, &name, Err(e.to_string()))?;
            }
        }
    }
    watcher.abort();

    info!(failed, folder = %folder, "Upload batch finished");
    Ok(failed)
}

fn json_error(e: serde_json::Error) -> JsonError {
    JsonError::new(e.to_string())
}

fn report(format: OutputFormat, name: &str, outcome: Result<serde_json::Value, String>) -> FolioResult<()> {
    match format {
        OutputFormat::Json => {
            let line = match outcome {
                Ok(file) => serde_json::json!({ "name": name, "file": file }),
                Err(message) => serde_json::json!({ "name": name, "error": message }),
            };
            println!("{}", serde_json::to_string(&line).map_err(json_error)?);
        }
        OutputFormat::Human => match outcome {
            Ok(file) => println!("uploaded  {}  {}", name, file["url"].as_str().unwrap_or_default()),
            Err(message) => println!("failed    {}  {}", name, message),
        },
    }
    Ok(())
}
