//! File metadata persistence.

use crate::folder_tree::load_folder;
use crate::models::{FileChangeset, FileRow, FileTagRow, NewFileRow, TagRow};
use crate::schema::{file_tags, files, tags};
use crate::Database;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use folio_core::{
    AssetKind, FilePatch, FileQuery, FolderFilter, MediaFile, ROOT_PATH, SortDirection, SortField,
    TagPatch, TagRef,
};
use folio_error::{DatabaseError, FolioError, FolioResult, LibraryError, LibraryErrorKind};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Everything needed to persist a freshly uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaFile {
    /// Display name
    pub name: String,
    /// Content hash
    pub hash: String,
    /// Asset category
    pub asset_kind: AssetKind,
    /// File extension including the dot
    pub ext: Option<String>,
    /// MIME type
    pub mime: String,
    /// Size in bytes
    pub size_bytes: i64,
    /// Pixel width for images
    pub width: Option<i32>,
    /// Pixel height for images
    pub height: Option<i32>,
    /// Public storage URL
    pub url: String,
    /// Optional preview URL
    pub preview_url: Option<String>,
    /// Provider name
    pub provider: String,
    /// Provider specific metadata
    pub provider_metadata: Option<serde_json::Value>,
    /// Owning folder id, `None` for the root
    pub folder: Option<i32>,
    /// Uploading user
    pub created_by: Option<i32>,
}

/// Reads and writes file rows and their tag links.
#[derive(Debug, Clone)]
pub struct FileRepository {
    db: Database,
}

impl FileRepository {
    /// Create a repository over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// One page of files in a folder, tags populated.
    #[tracing::instrument(skip(self), fields(folder = ?query.folder(), page = query.page()))]
    pub async fn find(&self, query: FileQuery) -> FolioResult<Vec<MediaFile>> {
        self.db.run(move |conn| find_files(conn, &query)).await
    }

    /// Number of files directly in a folder.
    #[tracing::instrument(skip(self))]
    pub async fn count(&self, folder: FolderFilter) -> FolioResult<i64> {
        self.db
            .run(move |conn| {
                let mut query = files::table.select(count_star()).into_boxed();
                query = match folder {
                    FolderFilter::Root => query.filter(files::folder_id.is_null()),
                    FolderFilter::Folder(id) => query.filter(files::folder_id.eq(id)),
                };
                Ok(query.first::<i64>(conn)?)
            })
            .await
    }

    /// The file with `uuid`.
    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, uuid: String) -> FolioResult<MediaFile> {
        self.db
            .run(move |conn| {
                let row = load_file(conn, &uuid)?;
                single(attach_tags(conn, vec![row])?, &uuid)
            })
            .await
    }

    /// Persist an uploaded file; its `folder_path` is taken from the folder row.
    #[tracing::instrument(skip(self, new), fields(hash = %new.hash, folder = ?new.folder))]
    pub async fn create(&self, new: NewMediaFile) -> FolioResult<MediaFile> {
        self.db.run(move |conn| create_file(conn, new)).await
    }

    /// Edit names, captions and tag links.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, uuid: String, patch: FilePatch, user: Option<i32>) -> FolioResult<MediaFile> {
        self.db
            .run(move |conn| update_file(conn, &uuid, &patch, user))
            .await
    }

    /// Delete files by uuid, returning the removed records.
    ///
    /// Unknown uuids are skipped; if none of them exist the call fails with
    /// `NotFound`.
    #[tracing::instrument(skip(self), fields(count = uuids.len()))]
    pub async fn delete(&self, uuids: Vec<String>) -> FolioResult<Vec<MediaFile>> {
        self.db.run(move |conn| delete_files(conn, uuids)).await
    }

    /// Of already deleted files, those whose stored object no remaining row
    /// references, one per object.
    #[tracing::instrument(skip(self, removed), fields(count = removed.len()))]
    pub async fn orphaned(&self, removed: Vec<MediaFile>) -> FolioResult<Vec<MediaFile>> {
        self.db
            .run(move |conn| {
                let hashes: Vec<String> = removed.iter().map(|file| file.hash.clone()).collect();
                let in_use: HashSet<(String, Option<String>)> = files::table
                    .filter(files::hash.eq_any(hashes))
                    .select((files::hash, files::ext))
                    .load::<(String, Option<String>)>(conn)?
                    .into_iter()
                    .collect();

                let mut seen = HashSet::new();
                Ok(removed
                    .into_iter()
                    .filter(|file| {
                        let object = (file.hash.clone(), file.ext.clone());
                        !in_use.contains(&object) && seen.insert(object)
                    })
                    .collect())
            })
            .await
    }
}

fn not_found(what: String) -> FolioError {
    LibraryError::new(LibraryErrorKind::NotFound(what)).into()
}

fn single(mut files: Vec<MediaFile>, uuid: &str) -> FolioResult<MediaFile> {
    files.pop().ok_or_else(|| not_found(format!("file {}", uuid)))
}

fn load_file(conn: &mut SqliteConnection, uuid: &str) -> FolioResult<FileRow> {
    files::table
        .filter(files::uuid.eq(uuid))
        .select(FileRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(format!("file {}", uuid)))
}

fn attach_tags(conn: &mut SqliteConnection, rows: Vec<FileRow>) -> FolioResult<Vec<MediaFile>> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut by_file: HashMap<i32, Vec<TagRef>> = HashMap::new();
    for (file_id, tag) in file_tags::table
        .inner_join(tags::table)
        .filter(file_tags::file_id.eq_any(ids))
        .select((file_tags::file_id, TagRow::as_select()))
        .order(tags::name.asc())
        .load::<(i32, TagRow)>(conn)?
    {
        by_file.entry(file_id).or_default().push(tag.to_ref());
    }

    rows.into_iter()
        .map(|row| {
            let tags = by_file.remove(&row.id).unwrap_or_default();
            row.into_media_file(tags)
        })
        .collect()
}

fn find_files(conn: &mut SqliteConnection, query: &FileQuery) -> FolioResult<Vec<MediaFile>> {
    let mut select = files::table.select(FileRow::as_select()).into_boxed();
    select = match query.folder() {
        FolderFilter::Root => select.filter(files::folder_id.is_null()),
        FolderFilter::Folder(id) => select.filter(files::folder_id.eq(*id)),
    };
    select = match (query.sort(), query.direction()) {
        (SortField::CreatedAt, SortDirection::Asc) => select.order(files::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Desc) => select.order(files::created_at.desc()),
        (SortField::UpdatedAt, SortDirection::Asc) => select.order(files::updated_at.asc()),
        (SortField::UpdatedAt, SortDirection::Desc) => select.order(files::updated_at.desc()),
        (SortField::Name, SortDirection::Asc) => select.order(files::name.asc()),
        (SortField::Name, SortDirection::Desc) => select.order(files::name.desc()),
        (SortField::Size, SortDirection::Asc) => select.order(files::size_bytes.asc()),
        (SortField::Size, SortDirection::Desc) => select.order(files::size_bytes.desc()),
    };
    select = match query.direction() {
        SortDirection::Asc => select.then_order_by(files::id.asc()),
        SortDirection::Desc => select.then_order_by(files::id.desc()),
    };

    let rows = select
        .offset(query.offset())
        .limit(query.limit())
        .load(conn)?;
    tracing::debug!(count = rows.len(), "Loaded files");
    attach_tags(conn, rows)
}

fn create_file(conn: &mut SqliteConnection, new: NewMediaFile) -> FolioResult<MediaFile> {
    let provider_metadata = new
        .provider_metadata
        .as_ref()
        .map(|value| serde_json::to_string(value))
        .transpose()
        .map_err(DatabaseError::from)?;

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let folder_path = match new.folder {
            Some(id) => load_folder(conn, id)?.path,
            None => ROOT_PATH.to_string(),
        };
        let uuid = Uuid::new_v4().to_string();
        let created_at = Utc::now().naive_utc();

        diesel::insert_into(files::table)
            .values(&NewFileRow {
                uuid: uuid.clone(),
                name: new.name,
                asset_type: new.asset_kind.as_str().to_string(),
                hash: new.hash,
                ext: new.ext,
                mime: new.mime,
                size_bytes: new.size_bytes,
                width: new.width,
                height: new.height,
                url: new.url,
                preview_url: new.preview_url,
                provider: new.provider,
                provider_metadata,
                alternative_text: None,
                caption: None,
                folder_id: new.folder,
                folder_path,
                created_by: new.created_by,
                updated_by: new.created_by,
                created_at,
                updated_at: created_at,
            })
            .execute(conn)?;

        let row = load_file(conn, &uuid)?;
        tracing::info!(uuid = %uuid, folder_path = %row.folder_path, "Created file");
        row.into_media_file(Vec::new())
    })
}

fn update_file(
    conn: &mut SqliteConnection,
    uuid: &str,
    patch: &FilePatch,
    user: Option<i32>,
) -> FolioResult<MediaFile> {
    let name = match patch.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(LibraryError::new(LibraryErrorKind::InvalidName(
                "file name must not be empty".to_string(),
            ))
            .into());
        }
        other => other.map(str::to_string),
    };

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let row = load_file(conn, uuid)?;

        diesel::update(files::table.find(row.id))
            .set(&FileChangeset {
                name,
                alternative_text: patch.alternative_text.clone(),
                caption: patch.caption.clone(),
                updated_by: user,
                updated_at: Utc::now().naive_utc(),
            })
            .execute(conn)?;

        if let Some(tags) = &patch.tags {
            apply_tag_patch(conn, row.id, tags)?;
        }

        let row = load_file(conn, uuid)?;
        single(attach_tags(conn, vec![row])?, uuid)
    })
}

/// Resolve tag uuids to ids, failing on the first unknown uuid.
pub(crate) fn resolve_tag_ids(conn: &mut SqliteConnection, uuids: &[String]) -> FolioResult<Vec<i32>> {
    if uuids.is_empty() {
        return Ok(Vec::new());
    }
    let known: HashMap<String, i32> = tags::table
        .filter(tags::uuid.eq_any(uuids.to_vec()))
        .select((tags::uuid, tags::id))
        .load::<(String, i32)>(conn)?
        .into_iter()
        .collect();

    uuids
        .iter()
        .map(|uuid| {
            known
                .get(uuid)
                .copied()
                .ok_or_else(|| not_found(format!("tag {}", uuid)))
        })
        .collect()
}

pub(crate) fn link(conn: &mut SqliteConnection, file_id: i32, tag_ids: &[i32]) -> FolioResult<()> {
    for &tag_id in tag_ids {
        diesel::insert_or_ignore_into(file_tags::table)
            .values(&FileTagRow { file_id, tag_id })
            .execute(conn)?;
    }
    Ok(())
}

fn apply_tag_patch(conn: &mut SqliteConnection, file_id: i32, patch: &TagPatch) -> FolioResult<()> {
    if let Some(set) = &patch.set {
        let tag_ids = resolve_tag_ids(conn, set)?;
        diesel::delete(file_tags::table.filter(file_tags::file_id.eq(file_id))).execute(conn)?;
        return link(conn, file_id, &tag_ids);
    }

    let connect = resolve_tag_ids(conn, &patch.connect)?;
    let disconnect = resolve_tag_ids(conn, &patch.disconnect)?;
    link(conn, file_id, &connect)?;
    if !disconnect.is_empty() {
        diesel::delete(
            file_tags::table
                .filter(file_tags::file_id.eq(file_id))
                .filter(file_tags::tag_id.eq_any(disconnect)),
        )
        .execute(conn)?;
    }
    Ok(())
}

fn delete_files(conn: &mut SqliteConnection, uuids: Vec<String>) -> FolioResult<Vec<MediaFile>> {
    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let rows: Vec<FileRow> = files::table
            .filter(files::uuid.eq_any(uuids.clone()))
            .select(FileRow::as_select())
            .load(conn)?;
        if rows.is_empty() {
            return Err(not_found(format!("files {:?}", uuids)));
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let removed = attach_tags(conn, rows)?;
        diesel::delete(files::table.filter(files::id.eq_any(ids))).execute(conn)?;

        tracing::info!(count = removed.len(), "Deleted files");
        Ok(removed)
    })
}
