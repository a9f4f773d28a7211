//! Tag persistence.

use crate::file_repository::link;
use crate::models::{NewTagRow, TagRow};
use crate::schema::{file_tags, files, tags};
use crate::{Database, validate_name};
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use folio_core::{NewTag, Tag, TagUpdate};
use folio_error::{FolioError, FolioResult, LibraryError, LibraryErrorKind};
use std::collections::HashMap;
use uuid::Uuid;

/// Reads and writes tags.
#[derive(Debug, Clone)]
pub struct TagRepository {
    db: Database,
}

impl TagRepository {
    /// Create a repository over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All tags with their file counts, ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn find(&self) -> FolioResult<Vec<Tag>> {
        self.db
            .run(|conn| {
                let rows: Vec<TagRow> = tags::table
                    .select(TagRow::as_select())
                    .order(tags::name.asc())
                    .load(conn)?;
                with_counts(conn, rows)
            })
            .await
    }

    /// Create a tag, optionally attaching it to files by uuid.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewTag, user: Option<i32>) -> FolioResult<Tag> {
        self.db.run(move |conn| create_tag(conn, new, user)).await
    }

    /// Rename a tag.
    #[tracing::instrument(skip(self, update), fields(name = %update.name))]
    pub async fn update(&self, uuid: String, update: TagUpdate) -> FolioResult<Tag> {
        self.db
            .run(move |conn| rename_tag(conn, &uuid, &update.name))
            .await
    }

    /// Delete tags by uuid, returning the removed tags.
    #[tracing::instrument(skip(self), fields(count = uuids.len()))]
    pub async fn delete(&self, uuids: Vec<String>) -> FolioResult<Vec<Tag>> {
        self.db.run(move |conn| delete_tags(conn, uuids)).await
    }
}

fn not_found(what: String) -> FolioError {
    LibraryError::new(LibraryErrorKind::NotFound(what)).into()
}

fn with_counts(conn: &mut SqliteConnection, rows: Vec<TagRow>) -> FolioResult<Vec<Tag>> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let counts: HashMap<i32, i64> = file_tags::table
        .filter(file_tags::tag_id.eq_any(ids))
        .group_by(file_tags::tag_id)
        .select((file_tags::tag_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let count = counts.get(&row.id).copied().unwrap_or(0);
            row.into_tag(count)
        })
        .collect())
}

fn load_tag(conn: &mut SqliteConnection, uuid: &str) -> FolioResult<TagRow> {
    tags::table
        .filter(tags::uuid.eq(uuid))
        .select(TagRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(format!("tag {}", uuid)))
}

fn ensure_unique_name(conn: &mut SqliteConnection, name: &str, exclude: Option<i32>) -> FolioResult<()> {
    let mut query = tags::table
        .filter(tags::name.eq(name))
        .select(tags::id)
        .into_boxed();
    if let Some(id) = exclude {
        query = query.filter(tags::id.ne(id));
    }
    let clash: Option<i32> = query.first(conn).optional()?;
    if clash.is_some() {
        return Err(LibraryError::new(LibraryErrorKind::DuplicateTagName(name.to_string())).into());
    }
    Ok(())
}

fn single(conn: &mut SqliteConnection, row: TagRow) -> FolioResult<Tag> {
    let uuid = row.uuid.clone();
    with_counts(conn, vec![row])?
        .pop()
        .ok_or_else(|| not_found(format!("tag {}", uuid)))
}

fn create_tag(conn: &mut SqliteConnection, new: NewTag, user: Option<i32>) -> FolioResult<Tag> {
    let name = validate_name(&new.name)?;

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        ensure_unique_name(conn, &name, None)?;

        let uuid = Uuid::new_v4().to_string();
        let created_at = Utc::now().naive_utc();
        diesel::insert_into(tags::table)
            .values(&NewTagRow {
                uuid: uuid.clone(),
                name: name.clone(),
                created_by: user,
                created_at,
                updated_at: created_at,
            })
            .execute(conn)?;
        let row = load_tag(conn, &uuid)?;

        for file_uuid in new.files.unwrap_or_default() {
            let file_id: i32 = files::table
                .filter(files::uuid.eq(&file_uuid))
                .select(files::id)
                .first(conn)
                .optional()?
                .ok_or_else(|| not_found(format!("file {}", file_uuid)))?;
            link(conn, file_id, &[row.id])?;
        }

        tracing::info!(uuid = %uuid, name = %name, "Created tag");
        single(conn, row)
    })
}

fn rename_tag(conn: &mut SqliteConnection, uuid: &str, name: &str) -> FolioResult<Tag> {
    let name = validate_name(name)?;

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let row = load_tag(conn, uuid)?;
        ensure_unique_name(conn, &name, Some(row.id))?;

        diesel::update(tags::table.find(row.id))
            .set((tags::name.eq(&name), tags::updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)?;

        tracing::info!(uuid = %uuid, name = %name, "Renamed tag");
        let row = load_tag(conn, uuid)?;
        single(conn, row)
    })
}

fn delete_tags(conn: &mut SqliteConnection, uuids: Vec<String>) -> FolioResult<Vec<Tag>> {
    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let rows: Vec<TagRow> = tags::table
            .filter(tags::uuid.eq_any(uuids.clone()))
            .select(TagRow::as_select())
            .load(conn)?;
        if rows.is_empty() {
            return Err(not_found(format!("tags {:?}", uuids)));
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let removed = with_counts(conn, rows)?;
        diesel::delete(tags::table.filter(tags::id.eq_any(ids))).execute(conn)?;

        tracing::info!(count = removed.len(), "Deleted tags");
        Ok(removed)
    })
}
