//! Tests for materialized path helpers.

use folio_core::{ROOT_PATH, descendant_pattern, is_within, join_path, rebase};

#[test]
fn test_join_under_root_and_nested() {
    let photos = join_path(ROOT_PATH, 1);
    assert_eq!(photos, "/1");

    let year = join_path(&photos, 2);
    assert_eq!(year, "/1/2");

    // Trailing slashes on the parent are tolerated
    assert_eq!(join_path("/1/", 9), "/1/9");
}

#[test]
fn test_is_within_matches_whole_segments() {
    assert!(is_within("/1", "/1"));
    assert!(is_within("/1/2/3", "/1"));
    assert!(is_within("/1/2/3", "/1/2"));
    assert!(!is_within("/12", "/1"));
    assert!(!is_within("/12/1", "/1"));
    assert!(!is_within("/2/1", "/1"));
}

#[test]
fn test_root_contains_everything() {
    assert!(is_within("/", ROOT_PATH));
    assert!(is_within("/4/5", ROOT_PATH));
}

#[test]
fn test_rebase_only_touches_leading_prefix() {
    // The old prefix text also appears deeper in the path
    assert_eq!(
        rebase("/1/11/1", "/1", "/3/1").as_deref(),
        Some("/3/1/11/1")
    );
    assert_eq!(rebase("/1", "/1", "/3/1").as_deref(), Some("/3/1"));
    assert_eq!(rebase("/4/1", "/1", "/3/1"), None);
}

#[test]
fn test_rebase_to_root_level() {
    assert_eq!(rebase("/5/7/8", "/5/7", "/7").as_deref(), Some("/7/8"));
}

#[test]
fn test_descendant_pattern() {
    assert_eq!(descendant_pattern("/1/2"), "/1/2/%");
    assert_eq!(descendant_pattern("/1/"), "/1/%");
}
