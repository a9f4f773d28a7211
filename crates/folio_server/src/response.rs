//! Mapping library errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::ErrorEnvelope;
use folio_error::{
    DatabaseErrorKind, FolioError, FolioErrorKind, LibraryErrorKind, StorageErrorKind,
    UploadErrorKind,
};

/// A [`FolioError`] rendered as an error envelope.
#[derive(Debug)]
pub struct ApiError(pub FolioError);

impl<E: Into<FolioError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Status code and error name for a library error.
pub fn classify(err: &FolioError) -> (StatusCode, &'static str) {
    match err.kind() {
        FolioErrorKind::Library(e) => match &e.kind {
            LibraryErrorKind::DuplicateFolderName(_) => (StatusCode::CONFLICT, "DuplicateFolderName"),
            LibraryErrorKind::DuplicateTagName(_) => (StatusCode::CONFLICT, "DuplicateTagName"),
            LibraryErrorKind::ParentFolderNotFound(_) => {
                (StatusCode::BAD_REQUEST, "ParentFolderNotFound")
            }
            LibraryErrorKind::FolderMoveFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "FolderMoveFailed")
            }
            LibraryErrorKind::InvalidMove(_) => (StatusCode::BAD_REQUEST, "InvalidMove"),
            LibraryErrorKind::InvalidName(_) => (StatusCode::BAD_REQUEST, "InvalidName"),
            LibraryErrorKind::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            LibraryErrorKind::HashMismatch { .. } => (StatusCode::BAD_REQUEST, "HashMismatch"),
            LibraryErrorKind::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            LibraryErrorKind::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
        },
        FolioErrorKind::Upload(e) => match &e.kind {
            UploadErrorKind::Duplicate { .. } => (StatusCode::CONFLICT, "DuplicateUpload"),
            _ => (StatusCode::BAD_REQUEST, "UploadError"),
        },
        FolioErrorKind::Storage(e) => match &e.kind {
            StorageErrorKind::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            StorageErrorKind::InvalidPath(_) => (StatusCode::BAD_REQUEST, "InvalidPath"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "StorageError"),
        },
        FolioErrorKind::Database(e) => match &e.kind {
            DatabaseErrorKind::NotFound => (StatusCode::NOT_FOUND, "NotFound"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
        },
        FolioErrorKind::Http(e) => (
            e.status
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            "HttpError",
        ),
        FolioErrorKind::Json(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
        FolioErrorKind::NotImplemented(_) => (StatusCode::NOT_IMPLEMENTED, "NotImplemented"),
        FolioErrorKind::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
    }
}

fn message(err: &FolioError) -> String {
    match err.kind() {
        FolioErrorKind::Library(e) => e.kind.to_string(),
        FolioErrorKind::Upload(e) => e.kind.to_string(),
        FolioErrorKind::Storage(e) => e.kind.to_string(),
        FolioErrorKind::Database(e) => e.kind.to_string(),
        FolioErrorKind::Http(e) => e.message.clone(),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, name) = classify(&self.0);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        let envelope = ErrorEnvelope::new(status.as_u16(), name, message(&self.0));
        (status, Json(envelope)).into_response()
    }
}
