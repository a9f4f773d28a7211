//! Fakes shared by the client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use folio_client::{HostRouter, LibraryApi, ProgressFn, UploadEvent, UploadSource, UploadTransport};
use folio_core::{
    AssetKind, DeleteFoldersReport, Folder, FolderKey, FolderPatch, FolderSummary, MediaFile,
    MediaFileBuilder, NewFolder, NewTag, Tag, UploadFileInfo,
};
use folio_error::{FolioResult, NotImplementedError, UploadError, UploadErrorKind};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore, broadcast};

pub fn media_file(hash: &str, name: &str, folder_path: &str) -> MediaFile {
    let now = chrono::Utc::now().naive_utc();
    MediaFileBuilder::default()
        .id(1)
        .uuid(format!("uuid-{}", hash))
        .name(name)
        .hash(hash)
        .asset_kind(AssetKind::Image)
        .mime("image/png")
        .size_bytes(4i64)
        .url(format!("/uploads/{}", hash))
        .provider("memory")
        .folder_path(folder_path)
        .created_at(now)
        .updated_at(now)
        .build()
        .unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut encoded = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .unwrap();
    encoded
}

/// Transport that records calls and can be held open or made to fail.
#[derive(Default)]
pub struct FakeTransport {
    calls: AtomicUsize,
    started: Notify,
    gate: Option<Semaphore>,
    failure: Option<String>,
}

impl FakeTransport {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Holds every transfer until [`release`](Self::release) is called.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self, transfers: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(transfers);
        }
    }
}

#[async_trait]
impl UploadTransport for FakeTransport {
    async fn upload(
        &self,
        source: &UploadSource,
        info: &UploadFileInfo,
        progress: ProgressFn,
    ) -> FolioResult<MediaFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        progress(50);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(message) = &self.failure {
            return Err(UploadError::new(UploadErrorKind::TransferFailed(message.clone())).into());
        }

        progress(100);
        Ok(media_file(&info.hash, source.name(), info.folder.folder_path()))
    }
}

/// Metadata API serving canned listings.
#[derive(Default)]
pub struct FakeApi {
    files: Mutex<HashMap<FolderKey, Vec<MediaFile>>>,
}

impl FakeApi {
    pub fn set_files(&self, folder: FolderKey, files: Vec<MediaFile>) {
        self.files.lock().insert(folder, files);
    }
}

#[async_trait]
impl LibraryApi for FakeApi {
    async fn list_files(&self, folder: &FolderKey) -> FolioResult<Vec<MediaFile>> {
        Ok(self.files.lock().get(folder).cloned().unwrap_or_default())
    }

    async fn list_folders(&self, _parent: &FolderKey) -> FolioResult<Vec<FolderSummary>> {
        Ok(Vec::new())
    }

    async fn create_folder(&self, _folder: NewFolder) -> FolioResult<Folder> {
        Err(NotImplementedError::new("create_folder").into())
    }

    async fn update_folder(&self, _id: i32, _patch: FolderPatch) -> FolioResult<Folder> {
        Err(NotImplementedError::new("update_folder").into())
    }

    async fn delete_folders(&self, _ids: Vec<i32>) -> FolioResult<DeleteFoldersReport> {
        Err(NotImplementedError::new("delete_folders").into())
    }

    async fn list_tags(&self) -> FolioResult<Vec<Tag>> {
        Ok(Vec::new())
    }

    async fn create_tag(&self, _tag: NewTag) -> FolioResult<Tag> {
        Err(NotImplementedError::new("create_tag").into())
    }
}

/// Host router that records where it was sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    visits: Arc<Mutex<Vec<FolderKey>>>,
}

impl RecordingRouter {
    pub fn visits(&self) -> Vec<FolderKey> {
        self.visits.lock().clone()
    }
}

impl HostRouter for RecordingRouter {
    fn navigate(&mut self, place: &FolderKey) {
        self.visits.lock().push(place.clone());
    }
}

/// Wait for the first event matching `predicate`.
pub async fn wait_for<F>(events: &mut broadcast::Receiver<UploadEvent>, mut predicate: F) -> UploadEvent
where
    F: FnMut(&UploadEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .unwrap()
}
