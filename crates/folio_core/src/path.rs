//! Materialized path helpers.
//!
//! Folder paths are built from opaque, never-reused `pathId`s joined with `/`:
//! a root-level folder with pathId 3 lives at `/3`, its child with pathId 8 at
//! `/3/8`. Files in the root carry the path `/`.

/// Path of the root folder.
pub const ROOT_PATH: &str = "/";

/// Path of a folder with `path_id` under `parent_path`.
///
/// # Examples
///
/// ```
/// use folio_core::join_path;
///
/// assert_eq!(join_path("/", 1), "/1");
/// assert_eq!(join_path("/1", 2), "/1/2");
/// ```
pub fn join_path(parent_path: &str, path_id: i32) -> String {
    let parent = parent_path.trim_end_matches('/');
    format!("{}/{}", parent, path_id)
}

/// Whether `candidate` equals `prefix` or lies below it.
///
/// Prefixes are matched on whole segments, so `/1` does not contain `/12`.
///
/// # Examples
///
/// ```
/// use folio_core::is_within;
///
/// assert!(is_within("/1/2", "/1"));
/// assert!(is_within("/1", "/1"));
/// assert!(!is_within("/12", "/1"));
/// ```
pub fn is_within(candidate: &str, prefix: &str) -> bool {
    if prefix == ROOT_PATH {
        return candidate.starts_with('/');
    }
    candidate == prefix
        || candidate
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Replace the leading `old_prefix` of `path` with `new_prefix`.
///
/// Returns `None` when `path` is not within `old_prefix`. Inner occurrences of
/// the prefix text are never touched.
///
/// # Examples
///
/// ```
/// use folio_core::rebase;
///
/// assert_eq!(rebase("/1/2", "/1", "/5/1").as_deref(), Some("/5/1/2"));
/// assert_eq!(rebase("/1/11/1", "/1", "/7/1").as_deref(), Some("/7/1/11/1"));
/// assert_eq!(rebase("/12", "/1", "/5/1"), None);
/// ```
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_within(path, old_prefix) {
        return None;
    }
    Some(format!("{}{}", new_prefix, &path[old_prefix.len()..]))
}

/// SQL `LIKE` pattern matching strict descendants of `prefix`.
///
/// Paths only contain digits and slashes, so no escaping is needed.
pub fn descendant_pattern(prefix: &str) -> String {
    format!("{}/%", prefix.trim_end_matches('/'))
}
