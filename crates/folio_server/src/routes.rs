//! Route table and handlers.

use crate::{
    Action, ApiError, Authorizer, ListOptions, MediaLibrary, Principal, ServerConfig,
    TokenAuthorizer, stage_upload,
};
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, put};
use folio_core::{
    DeleteFolders, DeleteFoldersReport, FileAction, Folder, FolderKey, FolderPatch, FolderSummary,
    MediaFile, NewFolder, NewTag, Tag, TagUpdate,
};
use folio_error::{LibraryError, LibraryErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Multipart framing allowance on top of the file size limit.
const BODY_OVERHEAD: u64 = 64 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    library: MediaLibrary,
    authorizer: Arc<dyn Authorizer>,
    max_upload_bytes: u64,
}

impl AppState {
    /// State gated by the token and read-only settings of `config`.
    pub fn new(library: MediaLibrary, config: &ServerConfig) -> Self {
        Self {
            library,
            authorizer: Arc::new(TokenAuthorizer::new(
                config.token().clone(),
                *config.read_only(),
            )),
            max_upload_bytes: *config.max_upload_bytes(),
        }
    }

    /// Replace the permission gate.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// The library service.
    pub fn library(&self) -> &MediaLibrary {
        &self.library
    }

    fn authorize(&self, action: Action, headers: &HeaderMap) -> Result<Principal, ApiError> {
        Ok(self.authorizer.authorize(action, headers)?)
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.max_upload_bytes.saturating_add(BODY_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/files",
            get(list_root_files).post(upload_file).patch(patch_files),
        )
        .route("/files/*folder", get(list_folder_files))
        .route(
            "/folders",
            get(list_folders).post(create_folder).delete(delete_folders),
        )
        .route(
            "/folders/:id",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/:uuid", put(update_tag).delete(delete_tag))
        .route("/uploads/*key", get(serve_object))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn list_root_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<MediaFile>>, ApiError> {
    state.authorize(Action::Read, &headers)?;
    Ok(Json(
        state.library.list_files(&FolderKey::root(), options).await?,
    ))
}

async fn list_folder_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(folder): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<MediaFile>>, ApiError> {
    state.authorize(Action::Read, &headers)?;
    Ok(Json(
        state
            .library
            .list_files(&FolderKey::new(folder), options)
            .await?,
    ))
}

async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaFile>), ApiError> {
    let principal = state.authorize(Action::Create, &headers)?;
    let staged = stage_upload(&mut multipart, state.max_upload_bytes).await?;
    let file = state.library.upload(staged, principal.user).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PatchOutcome {
    Deleted(Vec<MediaFile>),
    Updated(Box<MediaFile>),
}

async fn patch_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(action): Json<FileAction>,
) -> Result<Json<PatchOutcome>, ApiError> {
    match action {
        FileAction::Delete { uuid } => {
            state.authorize(Action::Delete, &headers)?;
            let removed = state.library.delete_files(uuid.into_vec()).await?;
            Ok(Json(PatchOutcome::Deleted(removed)))
        }
        FileAction::Update { uuid, patch } => {
            let principal = state.authorize(Action::Update, &headers)?;
            let file = state
                .library
                .files()
                .update(uuid, patch, principal.user)
                .await?;
            Ok(Json(PatchOutcome::Updated(Box::new(file))))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FolderListParams {
    parent: Option<i32>,
    path: Option<String>,
}

async fn list_folders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FolderListParams>,
) -> Result<Json<Vec<FolderSummary>>, ApiError> {
    state.authorize(Action::Read, &headers)?;
    let parent = match (params.parent, params.path) {
        (Some(_), Some(_)) => {
            return Err(LibraryError::new(LibraryErrorKind::InvalidRequest(
                "use either 'parent' or 'path', not both".to_string(),
            ))
            .into());
        }
        (Some(id), None) => Some(id),
        (None, Some(path)) => state.library.resolve_folder(&FolderKey::new(path)).await?,
        (None, None) => None,
    };
    Ok(Json(state.library.folders().find(parent).await?))
}

async fn get_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<FolderSummary>, ApiError> {
    state.authorize(Action::Read, &headers)?;
    Ok(Json(state.library.folders().find_one(id).await?))
}

async fn create_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewFolder>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let principal = state.authorize(Action::Create, &headers)?;
    let folder = state.library.folders().create(new, principal.user).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

async fn update_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(patch): Json<FolderPatch>,
) -> Result<Json<Folder>, ApiError> {
    let principal = state.authorize(Action::Update, &headers)?;
    Ok(Json(
        state
            .library
            .folders()
            .update(id, patch, principal.user)
            .await?,
    ))
}

async fn delete_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<DeleteFoldersReport>, ApiError> {
    state.authorize(Action::Delete, &headers)?;
    Ok(Json(state.library.delete_folders(vec![id]).await?))
}

async fn delete_folders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<DeleteFolders>,
) -> Result<Json<DeleteFoldersReport>, ApiError> {
    state.authorize(Action::Delete, &headers)?;
    Ok(Json(state.library.delete_folders(body.ids).await?))
}

async fn list_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Tag>>, ApiError> {
    state.authorize(Action::Read, &headers)?;
    Ok(Json(state.library.tags().find().await?))
}

async fn create_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewTag>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let principal = state.authorize(Action::Create, &headers)?;
    let tag = state.library.tags().create(new, principal.user).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn update_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
    Json(update): Json<TagUpdate>,
) -> Result<Json<Tag>, ApiError> {
    state.authorize(Action::Update, &headers)?;
    Ok(Json(state.library.tags().update(uuid, update).await?))
}

async fn delete_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    state.authorize(Action::Delete, &headers)?;
    Ok(Json(state.library.tags().delete(vec![uuid]).await?))
}

async fn serve_object(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    state.authorize(Action::Read, &headers)?;
    let data = state.library.read_object(&key).await?;
    let mime = mime_guess::from_path(&key).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], data).into_response())
}
