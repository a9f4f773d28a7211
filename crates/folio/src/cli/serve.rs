//! The `serve` command.

use folio::{AppState, Database, FolioConfig, FolioResult, MediaLibrary, bind, provider_from_config, serve};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Open the database, build the provider and serve until Ctrl-C.
pub async fn run_server(config: &FolioConfig, bind_override: Option<String>) -> FolioResult<()> {
    let server_config = match bind_override {
        Some(address) => config.server().clone().with_bind(address),
        None => config.server().clone(),
    };

    let db = Database::open(config.database())?;
    let provider = provider_from_config(config.storage())?;
    info!(
        database = %config.database().url(),
        provider = provider.name(),
        "Media library ready"
    );

    let library = MediaLibrary::new(db, provider);
    let listener = bind(&server_config).await?;
    println!("Listening on http://{}", server_config.bind());

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C");
            return;
        }
        info!("Shutdown requested");
        trigger.cancel();
    });

    serve(listener, AppState::new(library, &server_config), shutdown).await
}
