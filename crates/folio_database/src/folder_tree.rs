//! Folder tree mutations over materialized paths.
//!
//! Every folder stores the path of its ancestors' pathIds (`/1/4`), and
//! every file stores the path of its folder in `folder_path`. Subtree
//! queries are slash-delimited prefix matches: `col = P OR col LIKE 'P/%'`.
//! Moves rewrite both columns for the whole subtree inside one transaction,
//! replacing only the leading prefix of each value.

use crate::models::{FileRow, FolderRow, NewFolderRow};
use crate::schema::{files, folder_path_ids, folders};
use crate::{Database, validate_name};
use chrono::{NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::SqliteConnection;
use folio_core::{
    DeleteFoldersReport, Folder, FolderPatch, FolderSummary, NewFolder, ROOT_PATH,
    descendant_pattern, is_within, join_path,
};
use folio_error::{FolioError, FolioErrorKind, FolioResult, LibraryError, LibraryErrorKind};
use std::collections::HashMap;
use uuid::Uuid;

/// Creates, renames, moves and deletes folders.
#[derive(Debug, Clone)]
pub struct FolderTree {
    db: Database,
}

impl FolderTree {
    /// Create a folder tree over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a folder under `parent` (or the root).
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank name or one containing `/`,
    /// `ParentFolderNotFound` for an unknown parent and `DuplicateFolderName`
    /// when a sibling already carries the name.
    #[tracing::instrument(skip(self, new), fields(name = %new.name, parent = ?new.parent))]
    pub async fn create(&self, new: NewFolder, user: Option<i32>) -> FolioResult<Folder> {
        self.db
            .run(move |conn| create_folder(conn, &new, user))
            .await
    }

    /// Rename and/or move a folder.
    ///
    /// A rename leaves every path untouched. A move rewrites the path of the
    /// folder, of all its descendants and the `folder_path` of all their
    /// files; either all of it commits or none of it does.
    #[tracing::instrument(skip(self, patch), fields(name = ?patch.name, parent = ?patch.parent))]
    pub async fn update(&self, id: i32, patch: FolderPatch, user: Option<i32>) -> FolioResult<Folder> {
        self.db
            .run(move |conn| update_folder(conn, id, &patch, user))
            .await
    }

    /// Delete folders together with their subtrees and contained files.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, ids: Vec<i32>) -> FolioResult<DeleteFoldersReport> {
        self.db.run(move |conn| delete_folders(conn, &ids)).await
    }

    /// Folders directly under `parent` (or the root), ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn find(&self, parent: Option<i32>) -> FolioResult<Vec<FolderSummary>> {
        self.db.run(move |conn| list_folders(conn, parent)).await
    }

    /// One folder with its counts.
    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, id: i32) -> FolioResult<FolderSummary> {
        self.db
            .run(move |conn| {
                let row = load_folder(conn, id)?;
                let mut summaries = summarize(conn, vec![row])?;
                summaries
                    .pop()
                    .ok_or_else(|| not_found(format!("folder {}", id)))
            })
            .await
    }

    /// The folder stored at `path`.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_path(&self, path: String) -> FolioResult<Folder> {
        self.db
            .run(move |conn| Ok(load_folder_by_path(conn, &path)?.into()))
            .await
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn not_found(what: String) -> FolioError {
    LibraryError::new(LibraryErrorKind::NotFound(what)).into()
}

pub(crate) fn load_folder(conn: &mut SqliteConnection, id: i32) -> FolioResult<FolderRow> {
    folders::table
        .find(id)
        .select(FolderRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(format!("folder {}", id)))
}

pub(crate) fn load_folder_by_path(conn: &mut SqliteConnection, path: &str) -> FolioResult<FolderRow> {
    folders::table
        .filter(folders::path.eq(path))
        .select(FolderRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| not_found(format!("folder at {}", path)))
}

fn allocate_path_id(conn: &mut SqliteConnection) -> FolioResult<i32> {
    diesel::sql_query(
        "UPDATE folder_path_ids \
         SET last_value = MAX(last_value, (SELECT COALESCE(MAX(path_id), 0) FROM folders)) + 1 \
         WHERE id = 1",
    )
    .execute(conn)?;

    Ok(folder_path_ids::table
        .find(1)
        .select(folder_path_ids::last_value)
        .first::<i32>(conn)?)
}

fn ensure_unique_sibling(
    conn: &mut SqliteConnection,
    parent: Option<i32>,
    name: &str,
    exclude: Option<i32>,
) -> FolioResult<()> {
    let mut query = folders::table
        .filter(folders::name.eq(name))
        .select(folders::id)
        .into_boxed();
    query = match parent {
        Some(parent) => query.filter(folders::parent_id.eq(parent)),
        None => query.filter(folders::parent_id.is_null()),
    };
    if let Some(id) = exclude {
        query = query.filter(folders::id.ne(id));
    }

    let clash: Option<i32> = query.first(conn).optional()?;
    if clash.is_some() {
        return Err(LibraryError::new(LibraryErrorKind::DuplicateFolderName(name.to_string())).into());
    }
    Ok(())
}

fn create_folder(conn: &mut SqliteConnection, new: &NewFolder, user: Option<i32>) -> FolioResult<Folder> {
    let name = validate_name(&new.name)?;

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let parent_path = match new.parent {
            Some(parent) => folders::table
                .find(parent)
                .select(folders::path)
                .first::<String>(conn)
                .optional()?
                .ok_or_else(|| LibraryError::new(LibraryErrorKind::ParentFolderNotFound(parent)))?,
            None => ROOT_PATH.to_string(),
        };
        ensure_unique_sibling(conn, new.parent, &name, None)?;

        let path_id = allocate_path_id(conn)?;
        let path = join_path(&parent_path, path_id);
        let uuid = Uuid::new_v4().to_string();
        let created_at = now();

        diesel::insert_into(folders::table)
            .values(&NewFolderRow {
                uuid: uuid.clone(),
                name,
                path_id,
                path: path.clone(),
                parent_id: new.parent,
                created_by: user,
                updated_by: user,
                created_at,
                updated_at: created_at,
            })
            .execute(conn)?;

        let row: FolderRow = folders::table
            .filter(folders::uuid.eq(&uuid))
            .select(FolderRow::as_select())
            .first(conn)?;

        tracing::info!(id = row.id, path_id, path = %path, "Created folder");
        Ok(row.into())
    })
}

fn update_folder(
    conn: &mut SqliteConnection,
    id: i32,
    patch: &FolderPatch,
    user: Option<i32>,
) -> FolioResult<Folder> {
    let name = patch.name.as_deref().map(validate_name).transpose()?;

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let current = load_folder(conn, id)?;
        let name = name.unwrap_or_else(|| current.name.clone());

        match patch.parent {
            Some(parent) if parent != current.parent_id => {
                move_folder(conn, &current, parent, &name, user).map_err(into_move_failure)?;
            }
            _ => {
                if name != current.name {
                    ensure_unique_sibling(conn, current.parent_id, &name, Some(id))?;
                }
                diesel::update(folders::table.find(id))
                    .set((
                        folders::name.eq(&name),
                        folders::updated_by.eq(user),
                        folders::updated_at.eq(now()),
                    ))
                    .execute(conn)?;
                tracing::info!(id, name = %name, "Renamed folder");
            }
        }

        Ok(load_folder(conn, id)?.into())
    })
}

/// Storage failures during a move surface as `FolderMoveFailed`; validation
/// errors keep their own kind.
fn into_move_failure(err: FolioError) -> FolioError {
    match err.kind() {
        FolioErrorKind::Database(_) => {
            tracing::error!(error = %err, "Folder move rolled back");
            LibraryError::new(LibraryErrorKind::FolderMoveFailed(err.to_string())).into()
        }
        _ => err,
    }
}

fn move_folder(
    conn: &mut SqliteConnection,
    current: &FolderRow,
    new_parent: Option<i32>,
    name: &str,
    user: Option<i32>,
) -> FolioResult<()> {
    let destination_path = match new_parent {
        Some(parent_id) => {
            let parent = folders::table
                .find(parent_id)
                .select(FolderRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| LibraryError::new(LibraryErrorKind::ParentFolderNotFound(parent_id)))?;
            if is_within(&parent.path, &current.path) {
                return Err(LibraryError::new(LibraryErrorKind::InvalidMove(format!(
                    "folder {} cannot move below itself",
                    current.id
                )))
                .into());
            }
            parent.path
        }
        None => ROOT_PATH.to_string(),
    };
    ensure_unique_sibling(conn, new_parent, name, Some(current.id))?;

    let old_path = current.path.as_str();
    let new_path = join_path(&destination_path, current.path_id);
    let pattern = descendant_pattern(old_path);
    // substr is 1-based: keep everything after the old prefix
    let tail_start = old_path.len() as i32 + 1;

    diesel::update(folders::table.find(current.id))
        .set((
            folders::parent_id.eq(new_parent),
            folders::name.eq(name),
            folders::updated_by.eq(user),
            folders::updated_at.eq(now()),
        ))
        .execute(conn)?;

    let moved_folders = diesel::sql_query(
        "UPDATE folders SET path = ? || substr(path, ?) WHERE path = ? OR path LIKE ?",
    )
    .bind::<Text, _>(new_path.clone())
    .bind::<Integer, _>(tail_start)
    .bind::<Text, _>(old_path.to_string())
    .bind::<Text, _>(pattern.clone())
    .execute(conn)?;

    let moved_files = diesel::sql_query(
        "UPDATE files SET folder_path = ? || substr(folder_path, ?) \
         WHERE folder_path = ? OR folder_path LIKE ?",
    )
    .bind::<Text, _>(new_path.clone())
    .bind::<Integer, _>(tail_start)
    .bind::<Text, _>(old_path.to_string())
    .bind::<Text, _>(pattern.clone())
    .execute(conn)?;

    tracing::info!(
        id = current.id,
        from = %old_path,
        to = %new_path,
        moved_folders,
        moved_files,
        "Moved folder"
    );
    Ok(())
}

fn delete_folders(conn: &mut SqliteConnection, ids: &[i32]) -> FolioResult<DeleteFoldersReport> {
    let ids = ids.to_vec();

    conn.immediate_transaction::<_, FolioError, _>(|conn| {
        let targets: Vec<FolderRow> = folders::table
            .filter(folders::id.eq_any(ids.clone()))
            .select(FolderRow::as_select())
            .order(folders::path.asc())
            .load(conn)?;
        if targets.is_empty() {
            return Err(not_found(format!("folders {:?}", ids)));
        }

        let mut total_folder_number = 0;
        let mut removed_files = Vec::new();
        for target in &targets {
            let pattern = descendant_pattern(&target.path);

            let file_rows: Vec<FileRow> = files::table
                .filter(
                    files::folder_path
                        .eq(&target.path)
                        .or(files::folder_path.like(&pattern)),
                )
                .select(FileRow::as_select())
                .load(conn)?;
            if !file_rows.is_empty() {
                let file_ids: Vec<i32> = file_rows.iter().map(|row| row.id).collect();
                diesel::delete(files::table.filter(files::id.eq_any(file_ids))).execute(conn)?;
            }

            // A nested target was already removed with its ancestor and counts zero here
            total_folder_number += diesel::delete(
                folders::table.filter(folders::path.eq(&target.path).or(folders::path.like(&pattern))),
            )
            .execute(conn)?;

            for row in file_rows {
                removed_files.push(row.into_media_file(Vec::new())?);
            }
        }

        tracing::info!(
            folders = total_folder_number,
            files = removed_files.len(),
            "Deleted folders"
        );
        Ok(DeleteFoldersReport {
            folders: targets.into_iter().map(Folder::from).collect(),
            total_folder_number,
            total_file_number: removed_files.len(),
            files: removed_files,
        })
    })
}

fn list_folders(conn: &mut SqliteConnection, parent: Option<i32>) -> FolioResult<Vec<FolderSummary>> {
    let mut query = folders::table
        .select(FolderRow::as_select())
        .order((folders::name.asc(), folders::id.asc()))
        .into_boxed();
    query = match parent {
        Some(parent) => query.filter(folders::parent_id.eq(parent)),
        None => query.filter(folders::parent_id.is_null()),
    };
    let rows = query.load(conn)?;
    summarize(conn, rows)
}

fn summarize(conn: &mut SqliteConnection, rows: Vec<FolderRow>) -> FolioResult<Vec<FolderSummary>> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

    let child_counts: HashMap<i32, i64> = folders::table
        .filter(folders::parent_id.eq_any(ids.clone()))
        .group_by(folders::parent_id)
        .select((folders::parent_id, count_star()))
        .load::<(Option<i32>, i64)>(conn)?
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect();

    let file_counts: HashMap<i32, i64> = files::table
        .filter(files::folder_id.eq_any(ids))
        .group_by(files::folder_id)
        .select((files::folder_id, count_star()))
        .load::<(Option<i32>, i64)>(conn)?
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            FolderSummary {
                folder: row.into(),
                child_count: child_counts.get(&id).copied().unwrap_or(0),
                file_count: file_counts.get(&id).copied().unwrap_or(0),
            }
        })
        .collect())
}
