//! Query and patch shapes accepted by the metadata service.

use serde::{Deserialize, Deserializer, Serialize};

/// Default page size for file listings.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Which folder a file listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FolderFilter {
    /// Files stored directly in the root
    #[default]
    Root,
    /// Files stored directly in the given folder id
    Folder(i32),
}

impl From<Option<i32>> for FolderFilter {
    fn from(folder: Option<i32>) -> Self {
        match folder {
            Some(id) => FolderFilter::Folder(id),
            None => FolderFilter::Root,
        }
    }
}

/// Sortable file columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation time
    #[default]
    #[display("created_at")]
    CreatedAt,
    /// Last update time
    #[display("updated_at")]
    UpdatedAt,
    /// Display name
    #[display("name")]
    Name,
    /// Size in bytes
    #[display("size")]
    Size,
}

/// Sort direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    #[display("asc")]
    Asc,
    /// Descending
    #[default]
    #[display("desc")]
    Desc,
}

/// Filter, pagination and ordering for file listings.
///
/// # Examples
///
/// ```
/// use folio_core::{FileQueryBuilder, FolderFilter, SortDirection, SortField};
///
/// let query = FileQueryBuilder::default()
///     .folder(FolderFilter::Folder(3))
///     .sort(SortField::Name)
///     .direction(SortDirection::Asc)
///     .build()
///     .unwrap();
/// assert_eq!(*query.page(), 1);
/// assert_eq!(*query.page_size(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct FileQuery {
    /// Folder scope
    #[builder(default)]
    folder: FolderFilter,
    /// 1-based page number
    #[builder(default = "1")]
    page: i64,
    /// Page size
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    page_size: i64,
    /// Sort column
    #[builder(default)]
    sort: SortField,
    /// Sort direction
    #[builder(default)]
    direction: SortDirection,
}

impl FileQuery {
    /// Default listing of one folder.
    pub fn in_folder(folder: FolderFilter) -> Self {
        Self {
            folder,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }

    /// Row offset of the requested page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Row limit of the requested page.
    pub fn limit(&self) -> i64 {
        self.page_size.max(1)
    }
}

impl Default for FileQuery {
    fn default() -> Self {
        Self::in_folder(FolderFilter::Root)
    }
}

/// Tag association changes applied to one file.
///
/// `set` replaces the whole association; otherwise `connect` and
/// `disconnect` are applied in that order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagPatch {
    /// Replacement tag uuids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Vec<String>>,
    /// Tag uuids to attach
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connect: Vec<String>,
    /// Tag uuids to detach
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disconnect: Vec<String>,
}

impl TagPatch {
    /// Replace all tags.
    pub fn set(tags: Vec<String>) -> Self {
        Self {
            set: Some(tags),
            ..Self::default()
        }
    }

    /// Attach and detach tags.
    pub fn connect_disconnect(connect: Vec<String>, disconnect: Vec<String>) -> Self {
        Self {
            set: None,
            connect,
            disconnect,
        }
    }
}

/// Editable file fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New alternative text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_text: Option<String>,
    /// New caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Tag changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagPatch>,
}

/// Request to create a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFolder {
    /// Display name
    pub name: String,
    /// Parent folder id, `None` for the root
    #[serde(default)]
    pub parent: Option<i32>,
}

/// Folder rename and move request.
///
/// `parent` distinguishes "leave unchanged" (`None`) from "move to root"
/// (`Some(None)`); on the wire an absent key is the former and an explicit
/// `null` the latter.
///
/// # Examples
///
/// ```
/// use folio_core::FolderPatch;
///
/// let keep: FolderPatch = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
/// assert_eq!(keep.parent, None);
/// let to_root: FolderPatch = serde_json::from_str(r#"{"parent":null}"#).unwrap();
/// assert_eq!(to_root.parent, Some(None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderPatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New parent
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Option<i32>>,
}

impl FolderPatch {
    /// Rename only.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parent: None,
        }
    }

    /// Move only; `None` moves to the root.
    pub fn move_to(parent: Option<i32>) -> Self {
        Self {
            name: None,
            parent: Some(parent),
        }
    }
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request to create a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// File uuids to tag immediately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// Tag rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    /// New display name
    pub name: String,
}
