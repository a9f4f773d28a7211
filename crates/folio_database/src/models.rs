//! Diesel models for media library tables.

use crate::schema::{file_tags, files, folders, tags};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use folio_core::{AssetKind, Folder, MediaFile, Tag, TagRef};
use folio_error::{DatabaseError, DatabaseErrorKind, FolioResult};

/// Database row for the folders table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = folders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FolderRow {
    pub id: i32,
    pub uuid: String,
    pub name: String,
    pub path_id: i32,
    pub path: String,
    pub parent_id: Option<i32>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the folders table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = folders)]
pub struct NewFolderRow {
    pub uuid: String,
    pub name: String,
    pub path_id: i32,
    pub path: String,
    pub parent_id: Option<i32>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Folder {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            path_id: row.path_id,
            path: row.path,
            parent: row.parent_id,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for the files table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileRow {
    pub id: i32,
    pub uuid: String,
    pub name: String,
    pub asset_type: String,
    pub hash: String,
    pub ext: Option<String>,
    pub mime: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub url: String,
    pub preview_url: Option<String>,
    pub provider: String,
    pub provider_metadata: Option<String>,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub folder_id: Option<i32>,
    pub folder_path: String,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FileRow {
    /// Convert to the domain record with its tags attached.
    pub fn into_media_file(self, tags: Vec<TagRef>) -> FolioResult<MediaFile> {
        let asset_kind: AssetKind = self.asset_type.parse().map_err(|e: String| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "file {}: {}",
                self.uuid, e
            )))
        })?;
        let provider_metadata: Option<serde_json::Value> = self
            .provider_metadata
            .as_deref()
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(DatabaseError::from)?;

        Ok(MediaFile {
            id: self.id,
            uuid: self.uuid,
            name: self.name,
            hash: self.hash,
            asset_kind,
            mime: self.mime,
            ext: self.ext,
            size_bytes: self.size_bytes,
            width: self.width,
            height: self.height,
            url: self.url,
            preview_url: self.preview_url,
            provider: self.provider,
            provider_metadata,
            alternative_text: self.alternative_text,
            caption: self.caption,
            folder: self.folder_id,
            folder_path: self.folder_path,
            tags,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for the files table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
pub struct NewFileRow {
    pub uuid: String,
    pub name: String,
    pub asset_type: String,
    pub hash: String,
    pub ext: Option<String>,
    pub mime: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub url: String,
    pub preview_url: Option<String>,
    pub provider: String,
    pub provider_metadata: Option<String>,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub folder_id: Option<i32>,
    pub folder_path: String,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database row for the tags table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagRow {
    pub id: i32,
    pub uuid: String,
    pub name: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TagRow {
    /// Convert to the domain record.
    pub fn into_tag(self, file_count: i64) -> Tag {
        Tag {
            id: self.id,
            uuid: self.uuid,
            name: self.name,
            created_by: self.created_by,
            file_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Lightweight reference for embedding in file records.
    pub fn to_ref(&self) -> TagRef {
        TagRef {
            uuid: self.uuid.clone(),
            name: self.name.clone(),
        }
    }
}

/// Insertable struct for the tags table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub struct NewTagRow {
    pub uuid: String,
    pub name: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row of the file/tag join table.
#[derive(Debug, Clone, Copy, Queryable, Insertable, Selectable)]
#[diesel(table_name = file_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileTagRow {
    pub file_id: i32,
    pub tag_id: i32,
}

/// Partial update of a file row; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = files)]
pub struct FileChangeset {
    pub name: Option<String>,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub updated_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}
