//! Shared fixtures for API tests.

#![allow(dead_code)]

use folio_database::{Database, DatabaseConfig};
use folio_server::{AppState, MediaLibrary, ServerConfig, serve};
use bytes::Bytes;
use folio_error::FolioResult;
use folio_storage::{MediaProvider, MemoryProvider, ProviderObject, StoredObject};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const TOKEN: &str = "test-token";

/// A running server on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub provider: MemoryProvider,
    pub library: MediaLibrary,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let provider = MemoryProvider::new("/uploads");
        Self::start_with_provider(config, provider.clone(), Arc::new(provider)).await
    }

    /// Serve through `shared`; `provider` is the memory store behind it.
    pub async fn start_with_provider(
        config: ServerConfig,
        provider: MemoryProvider,
        shared: Arc<dyn MediaProvider>,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let url = dir.path().join("folio.db");
        let db = Database::open(&DatabaseConfig::new(url.to_string_lossy(), 4)).unwrap();
        let library = MediaLibrary::new(db, shared);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let shutdown = CancellationToken::new();
        let state = AppState::new(library.clone(), &config);
        let token = shutdown.clone();
        let task = tokio::spawn(async move {
            serve(listener, state, token).await.unwrap();
        });

        Self {
            base_url,
            provider,
            library,
            shutdown,
            task,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        self.task.await.unwrap();
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([20, 120, 220]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Multipart form the way the client sends it.
pub fn upload_form(name: &str, mime: &str, data: Vec<u8>, hash: &str, folder: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(data)
        .file_name(name.to_string())
        .mime_str(mime)
        .unwrap();
    reqwest::multipart::Form::new()
        .text("hash", hash.to_string())
        .text("folder", folder.to_string())
        .part("files", part)
}

/// Memory provider whose deletes wait until [`release`](Self::release).
pub struct GatedDeletes {
    inner: MemoryProvider,
    started: Notify,
    gate: Semaphore,
}

impl GatedDeletes {
    pub fn new(inner: MemoryProvider) -> Arc<Self> {
        Arc::new(Self {
            inner,
            started: Notify::new(),
            gate: Semaphore::new(0),
        })
    }

    pub async fn wait_delete(&self) {
        self.started.notified().await;
    }

    pub fn release(&self, deletes: usize) {
        self.gate.add_permits(deletes);
    }
}

#[async_trait::async_trait]
impl MediaProvider for GatedDeletes {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn upload(&self, object: &ProviderObject, data: Bytes) -> FolioResult<StoredObject> {
        self.inner.upload(object, data).await
    }

    async fn read(&self, key: &str) -> FolioResult<Bytes> {
        self.inner.read(key).await
    }

    async fn delete(&self, object: &ProviderObject) -> FolioResult<()> {
        self.started.notify_one();
        self.gate.acquire().await.unwrap().forget();
        self.inner.delete(object).await
    }
}
