//! HTTP implementation of the transport and metadata API.

use crate::{ClientConfig, LibraryApi, ProgressFn, SourceContent, UploadSource, UploadTransport};
use async_trait::async_trait;
use bytes::Bytes;
use folio_core::{
    DeleteFolders, DeleteFoldersReport, ErrorEnvelope, FIELD_ASSET_TYPE, FIELD_FILES,
    FIELD_FOLDER, FIELD_HASH, Folder, FolderKey, FolderPatch, FolderSummary, MediaFile, NewFolder,
    NewTag, Tag, UploadFileInfo,
};
use folio_error::{FolioResult, HttpError, UploadError, UploadErrorKind};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, instrument};

/// Talks to a Folio server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    chunk_size: usize,
}

impl HttpTransport {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> FolioResult<Self> {
        Self::from_config(&ClientConfig::new(base_url, token))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ClientConfig) -> FolioResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        debug!(base_url = %config.base_url(), "Creating HTTP transport");
        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            token: config.token().clone(),
            chunk_size: (*config.chunk_size()).max(1),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> FolioResult<T> {
        let response = self.authorize(request).send().await.map_err(|e| {
            error!("Request failed: {}", e);
            HttpError::new(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            error!(status = status.as_u16(), "Server returned error: {}", message);
            return Err(HttpError::with_status(status.as_u16(), message).into());
        }

        Ok(response
            .json()
            .await
            .map_err(|e| HttpError::new(format!("Failed to parse response: {}", e)))?)
    }

    async fn body_stream(
        &self,
        source: &UploadSource,
    ) -> FolioResult<BoxStream<'static, std::io::Result<Bytes>>> {
        match source.content() {
            SourceContent::Bytes(data) => {
                let data = data.clone();
                let chunk_size = self.chunk_size;
                let chunks = (0..data.len())
                    .step_by(chunk_size)
                    .map(move |start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
                    .collect::<Vec<_>>();
                Ok(stream::iter(chunks).boxed())
            }
            SourceContent::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    UploadError::new(UploadErrorKind::TransferFailed(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
                Ok(ReaderStream::with_capacity(file, self.chunk_size).boxed())
            }
        }
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("Server returned: {}", status),
    }
}

fn with_progress(
    body: BoxStream<'static, std::io::Result<Bytes>>,
    total: u64,
    progress: ProgressFn,
) -> BoxStream<'static, std::io::Result<Bytes>> {
    let total = total.max(1);
    let mut sent = 0u64;
    body.map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            progress(((sent * 100) / total).min(100) as u8);
        }
        chunk
    })
    .boxed()
}

#[async_trait]
impl UploadTransport for HttpTransport {
    #[instrument(skip(self, source, progress), fields(name = %source.name(), hash = %info.hash))]
    async fn upload(
        &self,
        source: &UploadSource,
        info: &UploadFileInfo,
        progress: ProgressFn,
    ) -> FolioResult<MediaFile> {
        let transfer_failed = |message: String| UploadError::new(UploadErrorKind::TransferFailed(message));

        let body = with_progress(self.body_stream(source).await?, *source.size(), progress);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), *source.size())
            .file_name(source.name().clone())
            .mime_str(source.mime())
            .map_err(|e| transfer_failed(format!("Invalid MIME type: {}", e)))?;

        let form = Form::new()
            .text(FIELD_HASH, info.hash.clone())
            .text(FIELD_ASSET_TYPE, info.asset_kind.as_str())
            .text(FIELD_FOLDER, info.folder.to_string())
            .part(FIELD_FILES, part);

        let request = self.authorize(self.client.post(self.url("/files")).multipart(form));
        let response = request
            .send()
            .await
            .map_err(|e| transfer_failed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            error!(status = status.as_u16(), "Upload rejected: {}", message);
            return Err(transfer_failed(message).into());
        }

        let file: MediaFile = response
            .json()
            .await
            .map_err(|e| transfer_failed(format!("Failed to parse response: {}", e)))?;
        debug!(uuid = %file.uuid, "Upload persisted");
        Ok(file)
    }
}

#[async_trait]
impl LibraryApi for HttpTransport {
    #[instrument(skip(self))]
    async fn list_files(&self, folder: &FolderKey) -> FolioResult<Vec<MediaFile>> {
        let path = match folder.route_segment() {
            Some(segment) => format!("/files/{}", segment),
            None => "/files".to_string(),
        };
        self.send_json(self.client.get(self.url(&path))).await
    }

    #[instrument(skip(self))]
    async fn list_folders(&self, parent: &FolderKey) -> FolioResult<Vec<FolderSummary>> {
        let mut request = self.client.get(self.url("/folders"));
        if !parent.is_root() {
            request = request.query(&[("path", parent.folder_path())]);
        }
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn create_folder(&self, folder: NewFolder) -> FolioResult<Folder> {
        self.send_json(self.client.post(self.url("/folders")).json(&folder))
            .await
    }

    #[instrument(skip(self))]
    async fn update_folder(&self, id: i32, patch: FolderPatch) -> FolioResult<Folder> {
        self.send_json(
            self.client
                .put(self.url(&format!("/folders/{}", id)))
                .json(&patch),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_folders(&self, ids: Vec<i32>) -> FolioResult<DeleteFoldersReport> {
        self.send_json(
            self.client
                .delete(self.url("/folders"))
                .json(&DeleteFolders { ids }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_tags(&self) -> FolioResult<Vec<Tag>> {
        self.send_json(self.client.get(self.url("/tags"))).await
    }

    #[instrument(skip(self))]
    async fn create_tag(&self, tag: NewTag) -> FolioResult<Tag> {
        self.send_json(self.client.post(self.url("/tags")).json(&tag))
            .await
    }
}
