//! Core data types for the Folio media library.
//!
//! This crate provides the data model shared by the server, the database layer
//! and the client upload pipeline: asset kinds, in-flight upload items, persisted
//! files, folders and tags, folder keys and the materialized path helpers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod folder_key;
mod media;
mod path;
mod query;
mod upload;
mod wire;

pub use asset::AssetKind;
pub use folder_key::{FolderKey, ROOT_FOLDER_KEY};
pub use media::{
    DeleteFoldersReport, Folder, FolderSummary, MediaFile, MediaFileBuilder, Tag, TagRef,
};
pub use path::{ROOT_PATH, descendant_pattern, is_within, join_path, rebase};
pub use query::{
    FilePatch, FileQuery, FileQueryBuilder, FolderFilter, FolderPatch, NewFolder, NewTag,
    SortDirection, SortField, TagPatch, TagUpdate, DEFAULT_PAGE_SIZE,
};
pub use upload::{
    FIELD_ASSET_TYPE, FIELD_FILES, FIELD_FOLDER, FIELD_HASH, UploadFileInfo, UploadItem,
    UploadStatus,
};
pub use wire::{DeleteFolders, ErrorDetail, ErrorEnvelope, FileAction, OneOrMany};
