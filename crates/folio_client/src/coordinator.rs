//! Upload coordination: dedupe, register, preview, transfer, reconcile.

use crate::preview::{DEFAULT_PREVIEW_EDGE, generate_preview};
use crate::{
    Notice, RegistrationId, UploadEvent, UploadRegistry, UploadSource, UploadTransport,
};
use folio_core::{AssetKind, FolderKey, MediaFile, UploadFileInfo, UploadItem, UploadStatus};
use folio_error::{FolioError, FolioResult, UploadError, UploadErrorKind};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const EVENT_CAPACITY: usize = 256;

/// A running upload.
#[derive(Debug)]
pub struct UploadHandle {
    cancel: CancellationToken,
    task: JoinHandle<FolioResult<MediaFile>>,
}

impl UploadHandle {
    /// Abort the upload. The result resolves to a cancellation error unless
    /// the transfer already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this upload when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the persisted record.
    pub async fn result(self) -> FolioResult<MediaFile> {
        self.task
            .await
            .map_err(|e| UploadError::new(UploadErrorKind::TransferFailed(e.to_string())))?
    }
}

/// Runs uploads concurrently against one in-flight registry.
///
/// The coordinator is cheap to clone; clones share the registry and the
/// event channels.
#[derive(Clone)]
pub struct UploadCoordinator {
    transport: Arc<dyn UploadTransport>,
    registry: UploadRegistry,
    events: broadcast::Sender<UploadEvent>,
    notices: broadcast::Sender<Notice>,
    preview_edge: u32,
}

impl std::fmt::Debug for UploadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCoordinator")
            .field("registry", &self.registry)
            .field("preview_edge", &self.preview_edge)
            .finish()
    }
}

impl UploadCoordinator {
    /// Create a coordinator with an empty registry.
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (notices, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            registry: UploadRegistry::new(),
            events,
            notices,
            preview_edge: DEFAULT_PREVIEW_EDGE,
        }
    }

    /// Set the preview square edge in pixels.
    pub fn with_preview_edge(mut self, edge: u32) -> Self {
        self.preview_edge = edge;
        self
    }

    /// The shared in-flight registry.
    pub fn registry(&self) -> &UploadRegistry {
        &self.registry
    }

    /// Subscribe to upload lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// Subscribe to user-facing notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// In-flight items of a folder in registration order.
    pub fn items(&self, folder: &FolderKey) -> Vec<UploadItem> {
        self.registry.items(folder)
    }

    /// Drop in-flight items superseded by a fetched listing.
    pub fn reconcile(&self, folder: &FolderKey, files: &[MediaFile]) -> Vec<UploadItem> {
        let removed = self.registry.reconcile(folder, files);
        if !removed.is_empty() {
            debug!(folder = %folder, count = removed.len(), "Reconciled in-flight uploads");
        }
        removed
    }

    /// Start uploading `source` into `folder`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_upload(&self, source: UploadSource, folder: FolderKey) -> UploadHandle {
        let cancel = CancellationToken::new();
        let coordinator = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move { coordinator.run(source, folder, token).await });
        UploadHandle { cancel, task }
    }

    #[instrument(skip(self, source, cancel), fields(name = %source.name(), folder = %folder))]
    async fn run(
        &self,
        source: UploadSource,
        folder: FolderKey,
        cancel: CancellationToken,
    ) -> FolioResult<MediaFile> {
        let hash = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.notify(Notice::Info(format!("Upload of {} cancelled", source.name())));
                return Err(UploadError::new(UploadErrorKind::Cancelled).into());
            }
            hash = source.content_hash() => hash,
        };
        let hash = match hash {
            Ok(hash) => hash,
            Err(e) => {
                self.notify(Notice::Error(format!("Could not read {}: {}", source.name(), e)));
                return Err(e);
            }
        };

        let item = UploadItem::queued(
            hash.clone(),
            source.name().clone(),
            *source.size(),
            source.mime(),
            folder.clone(),
        );
        let id = match self.registry.try_register(item.clone()) {
            Ok(id) => id,
            Err(e) => {
                info!(hash = %hash, "Identical content already uploading into this folder");
                self.emit(UploadEvent::Rejected {
                    folder: folder.clone(),
                    hash: hash.clone(),
                });
                self.notify(Notice::Error(format!(
                    "{} is already being uploaded to this folder",
                    source.name()
                )));
                return Err(e);
            }
        };
        self.emit(UploadEvent::Registered(item.clone()));

        if item.asset_kind == AssetKind::Image {
            self.spawn_preview(&source, &folder, &hash, id);
        }

        let info = UploadFileInfo {
            hash: hash.clone(),
            asset_kind: item.asset_kind,
            folder: folder.clone(),
        };
        let progress = self.progress_fn(&folder, &hash, id);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UploadError::new(UploadErrorKind::Cancelled).into()),
            result = self.transport.upload(&source, &info, progress) => result,
        };

        match outcome {
            Ok(file) => {
                self.registry.update(&folder, &hash, id, |item| {
                    item.status = UploadStatus::Complete;
                    item.progress = Some(100);
                });
                debug!(hash = %hash, url = %file.url, "Upload complete");
                self.emit(UploadEvent::Completed {
                    folder,
                    hash,
                    file: Box::new(file.clone()),
                });
                Ok(file)
            }
            Err(e) => {
                self.registry.remove(&folder, &hash, id);
                self.report_failure(source.name(), folder, hash, &e);
                Err(e)
            }
        }
    }

    fn report_failure(&self, name: &str, folder: FolderKey, hash: String, err: &FolioError) {
        if err.is_cancelled() {
            info!(hash = %hash, "Upload cancelled");
            self.emit(UploadEvent::Cancelled { folder, hash });
            self.notify(Notice::Info(format!("Upload of {} cancelled", name)));
        } else {
            warn!(hash = %hash, error = %err, "Upload failed");
            self.emit(UploadEvent::Failed {
                folder,
                hash,
                message: err.to_string(),
            });
            self.notify(Notice::Error(format!("Upload of {} failed: {}", name, err)));
        }
    }

    fn spawn_preview(
        &self,
        source: &UploadSource,
        folder: &FolderKey,
        hash: &str,
        id: RegistrationId,
    ) {
        let coordinator = self.clone();
        let source = source.clone();
        let folder = folder.clone();
        let hash = hash.to_string();
        tokio::spawn(async move {
            let rendered = match source.read_all().await {
                Ok(data) => generate_preview(data, source.mime(), coordinator.preview_edge).await,
                Err(e) => Err(e),
            };
            match rendered {
                Ok(Some(preview_url)) => {
                    let attached = coordinator.registry.update(&folder, &hash, id, |item| {
                        item.preview_url = Some(preview_url.clone());
                        if item.status == UploadStatus::Queued {
                            item.status = UploadStatus::Uploading;
                        }
                    });
                    if attached.is_some() {
                        coordinator.emit(UploadEvent::PreviewReady {
                            folder,
                            hash,
                            preview_url,
                        });
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(hash = %hash, error = %e, "Preview generation failed"),
            }
        });
    }

    fn progress_fn(&self, folder: &FolderKey, hash: &str, id: RegistrationId) -> crate::ProgressFn {
        let coordinator = self.clone();
        let folder = folder.clone();
        let hash = hash.to_string();
        Arc::new(move |percent: u8| {
            let updated = coordinator.registry.update(&folder, &hash, id, |item| {
                item.progress = Some(percent);
                if item.status == UploadStatus::Queued {
                    item.status = UploadStatus::Uploading;
                }
            });
            if updated.is_some() {
                coordinator.emit(UploadEvent::Progress {
                    folder: folder.clone(),
                    hash: hash.clone(),
                    percent,
                });
            }
        })
    }

    fn emit(&self, event: UploadEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }
}
