//! Listener setup and the serve loop.

use crate::{AppState, ServerConfig, router};
use folio_error::{FolioResult, HttpError};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> FolioResult<TcpListener> {
    let listener = TcpListener::bind(config.bind())
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {}: {}", config.bind(), e)))?;
    Ok(listener)
}

/// Serve the API on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> FolioResult<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| HttpError::new(format!("Listener has no address: {}", e)))?;
    info!(%addr, "Starting media library API");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HttpError::new(format!("Server error: {}", e)))?;

    info!("Media library API stopped");
    Ok(())
}
