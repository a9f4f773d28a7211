//! Multipart upload intake.
//!
//! The file part is streamed into a private working directory while its
//! digest is computed, so the service can verify the client's hash before
//! anything reaches the provider.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use folio_core::{FIELD_ASSET_TYPE, FIELD_FILES, FIELD_FOLDER, FIELD_HASH, AssetKind, FolderKey};
use folio_error::{FolioError, FolioResult, LibraryError, LibraryErrorKind, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

/// An uploaded file parked on local disk.
///
/// The working directory is removed when the value is dropped.
#[derive(Debug, derive_getters::Getters)]
pub struct StagedUpload {
    #[getter(skip)]
    dir: TempDir,
    path: PathBuf,
    name: String,
    mime: String,
    size: u64,
    computed_hash: String,
    claimed_hash: Option<String>,
    asset_kind: Option<AssetKind>,
    folder: FolderKey,
}

impl StagedUpload {
    /// Directory holding the staged file.
    pub fn working_dir(&self) -> &Path {
        self.dir.path()
    }
}

fn invalid_request(message: impl Into<String>) -> FolioError {
    LibraryError::new(LibraryErrorKind::InvalidRequest(message.into())).into()
}

fn multipart_error(e: MultipartError) -> FolioError {
    invalid_request(format!("Malformed multipart body: {}", e))
}

fn write_error(path: &Path, e: std::io::Error) -> FolioError {
    StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e))).into()
}

#[derive(Debug)]
struct StagedPart {
    dir: TempDir,
    path: PathBuf,
    name: String,
    mime: String,
    size: u64,
    hash: String,
}

/// Read an upload request, staging its file part.
///
/// On error the rest of the body is drained so the client sees the error
/// response instead of a reset connection.
#[instrument(skip(multipart))]
pub async fn stage_upload(multipart: &mut Multipart, max_bytes: u64) -> FolioResult<StagedUpload> {
    let result = read_parts(multipart, max_bytes).await;
    if let Err(e) = &result {
        warn!(error = %e, "Upload rejected during intake, draining body");
        while let Ok(Some(mut field)) = multipart.next_field().await {
            while let Ok(Some(_)) = field.chunk().await {}
        }
    }
    result
}

async fn read_parts(multipart: &mut Multipart, max_bytes: u64) -> FolioResult<StagedUpload> {
    let mut part: Option<StagedPart> = None;
    let mut claimed_hash = None;
    let mut asset_kind = None;
    let mut folder = FolderKey::root();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            FIELD_FILES => {
                if part.is_some() {
                    return Err(invalid_request("only one file may be uploaded per request"));
                }
                part = Some(stage_part(field, max_bytes).await?);
            }
            FIELD_HASH => {
                let hash = field.text().await.map_err(multipart_error)?;
                claimed_hash = Some(hash.trim().to_lowercase());
            }
            FIELD_ASSET_TYPE => {
                let kind = field.text().await.map_err(multipart_error)?;
                asset_kind = Some(kind.trim().parse::<AssetKind>().map_err(invalid_request)?);
            }
            FIELD_FOLDER => {
                folder = FolderKey::new(field.text().await.map_err(multipart_error)?);
            }
            other => debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let part = part.ok_or_else(|| invalid_request(format!("missing '{}' part", FIELD_FILES)))?;
    Ok(StagedUpload {
        dir: part.dir,
        path: part.path,
        name: part.name,
        mime: part.mime,
        size: part.size,
        computed_hash: part.hash,
        claimed_hash,
        asset_kind,
        folder,
    })
}

async fn stage_part(
    mut field: axum::extract::multipart::Field<'_>,
    max_bytes: u64,
) -> FolioResult<StagedPart> {
    let name = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "unnamed".to_string());
    let mime = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| mime_guess::from_path(&name).first_or_octet_stream().to_string());

    let dir = tempfile::Builder::new()
        .prefix("folio-upload-")
        .tempdir()
        .map_err(|e| StorageError::new(StorageErrorKind::DirectoryCreation(e.to_string())))?;
    let path = dir.path().join("content");
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| write_error(&path, e))?;

    let mut hasher = Sha256::new();
    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        if size > max_bytes {
            return Err(invalid_request(format!(
                "file exceeds the upload limit of {} bytes",
                max_bytes
            )));
        }
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .map_err(|e| write_error(&path, e))?;
    }
    file.flush().await.map_err(|e| write_error(&path, e))?;

    let hash = format!("{:x}", hasher.finalize());
    debug!(name = %name, size, hash = %hash, "Staged upload");
    Ok(StagedPart {
        dir,
        path,
        name,
        mime,
        size,
        hash,
    })
}

/// File extension including the dot, from the name or else the MIME type.
///
/// # Examples
///
/// ```
/// use folio_server::extension_for;
///
/// assert_eq!(extension_for("Photo.JPG", "image/jpeg").as_deref(), Some(".jpg"));
/// assert_eq!(extension_for("README", "application/pdf").as_deref(), Some(".pdf"));
/// assert_eq!(extension_for("README", "application/x-unknown"), None);
/// ```
pub fn extension_for(name: &str, mime: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .or_else(|| {
            mime_guess::get_mime_extensions_str(mime)
                .and_then(|exts| exts.first())
                .map(|ext| format!(".{}", ext))
        })
}
