//! Tests for folder creation, renames, moves and subtree deletion.

mod common;

use common::{file, folder, open_database};
use diesel::RunQueryDsl;
use folio_core::{FolderPatch, NewFolder, is_within, rebase};
use folio_database::{FileRepository, FolderTree};
use folio_error::LibraryErrorKind;

#[tokio::test]
async fn test_create_and_rename_scenario() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let photos = folder(&tree, "Photos", None).await;
    assert_eq!(photos.path_id, 1);
    assert_eq!(photos.path, "/1");
    assert_eq!(photos.parent, None);

    let year = folder(&tree, "2024", Some(photos.id)).await;
    assert_eq!(year.path, "/1/2");
    assert_eq!(year.parent, Some(photos.id));

    let renamed = tree
        .update(photos.id, FolderPatch::rename("Pictures"), Some(2))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Pictures");
    assert_eq!(renamed.path, "/1");
    assert_eq!(renamed.updated_by, Some(2));

    let child = tree.find_one(year.id).await.unwrap();
    assert_eq!(child.folder.path, "/1/2");
}

#[tokio::test]
async fn test_sibling_names_are_unique() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let photos = folder(&tree, "Photos", None).await;
    let err = tree
        .create(
            NewFolder {
                name: " Photos ".to_string(),
                parent: None,
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::DuplicateFolderName(name)) if name == "Photos"
    ));

    // Same name under a different parent is fine
    let nested = folder(&tree, "Photos", Some(photos.id)).await;
    assert_eq!(nested.path, "/1/2");

    let docs = folder(&tree, "Docs", None).await;
    let err = tree
        .update(docs.id, FolderPatch::rename("Photos"), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::DuplicateFolderName(_))
    ));
}

#[tokio::test]
async fn test_create_rejects_missing_parent_and_bad_names() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let err = tree
        .create(
            NewFolder {
                name: "Orphan".to_string(),
                parent: Some(42),
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::ParentFolderNotFound(42))
    ));

    for bad in ["", "   ", "a/b"] {
        let err = tree
            .create(
                NewFolder {
                    name: bad.to_string(),
                    parent: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.library_kind(),
            Some(LibraryErrorKind::InvalidName(_))
        ));
    }

    // Nothing was written by the rejected calls
    assert!(tree.find(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_path_ids_are_never_reused() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let a = folder(&tree, "A", None).await;
    let b = folder(&tree, "B", None).await;
    assert_eq!((a.path_id, b.path_id), (1, 2));

    tree.delete(vec![b.id]).await.unwrap();
    let c = folder(&tree, "C", None).await;
    assert_eq!(c.path_id, 3);
    assert_eq!(c.path, "/3");
}

#[tokio::test]
async fn test_concurrent_creation_allocates_distinct_path_ids() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let creations = (0..12).map(|i| {
        let tree = tree.clone();
        async move {
            tree.create(
                NewFolder {
                    name: format!("folder-{}", i),
                    parent: None,
                },
                None,
            )
            .await
        }
    });
    let created = futures::future::join_all(creations).await;

    let mut path_ids: Vec<i32> = created
        .into_iter()
        .map(|folder| folder.unwrap().path_id)
        .collect();
    path_ids.sort();
    assert_eq!(path_ids, (1..=12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_move_rewrites_subtree_only() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db.clone());
    let files = FileRepository::new(db);

    let a = folder(&tree, "A", None).await; // /1
    let b = folder(&tree, "B", Some(a.id)).await; // /1/2
    let c = folder(&tree, "C", Some(b.id)).await; // /1/2/3
    let d = folder(&tree, "D", None).await; // /4
    for i in 5..=10 {
        folder(&tree, &format!("filler-{}", i), None).await;
    }
    let eleven = folder(&tree, "Eleven", None).await;
    assert_eq!(eleven.path, "/11");

    let in_a = file(&files, "a.png", "aa01", Some(a.id)).await;
    let in_c = file(&files, "c.png", "cc01", Some(c.id)).await;
    let in_eleven = file(&files, "e.png", "ee01", Some(eleven.id)).await;
    let in_root = file(&files, "r.png", "ff01", None).await;
    assert_eq!(in_root.folder_path, "/");

    let moved = tree
        .update(a.id, FolderPatch::move_to(Some(d.id)), None)
        .await
        .unwrap();
    assert_eq!(moved.path, "/4/1");
    assert_eq!(moved.parent, Some(d.id));

    assert_eq!(tree.find_one(b.id).await.unwrap().folder.path, "/4/1/2");
    assert_eq!(tree.find_one(c.id).await.unwrap().folder.path, "/4/1/2/3");

    let in_a = files.find_one(in_a.uuid).await.unwrap();
    let in_c = files.find_one(in_c.uuid).await.unwrap();
    assert_eq!(in_a.folder_path, "/4/1");
    assert_eq!(in_c.folder_path, "/4/1/2/3");
    for moved_file in [&in_a, &in_c] {
        assert!(is_within(&moved_file.folder_path, &moved.path));
    }

    // Rows outside the subtree are untouched, including /11 which shares the "/1" text prefix
    assert_eq!(tree.find_one(eleven.id).await.unwrap().folder.path, "/11");
    assert_eq!(
        files.find_one(in_eleven.uuid).await.unwrap().folder_path,
        "/11"
    );
    assert_eq!(files.find_one(in_root.uuid).await.unwrap().folder_path, "/");
    assert_eq!(tree.find_one(d.id).await.unwrap().folder.path, "/4");
}

#[tokio::test]
async fn test_move_matches_rebased_snapshot() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db.clone());
    let files = FileRepository::new(db);

    let a = folder(&tree, "A", None).await; // /1
    let mut roots = Vec::new();
    for i in 2..=10 {
        roots.push(folder(&tree, &format!("root-{}", i), None).await);
    }
    let eleven = folder(&tree, "Eleven", None).await; // /11
    let x = folder(&tree, "X", Some(a.id)).await; // /1/12
    let y = folder(&tree, "Y", Some(x.id)).await; // /1/12/13
    let z = folder(&tree, "Z", Some(eleven.id)).await; // /11/14
    let target = roots[2].clone(); // /4

    let mut all = vec![a.clone(), eleven.clone(), x, y.clone(), z.clone()];
    all.extend(roots);
    let mut placed = Vec::new();
    for (i, parent) in [Some(&a), Some(&y), Some(&eleven), Some(&z), None].into_iter().enumerate() {
        let hash = format!("{:02x}{:02x}", i, i);
        placed.push(file(&files, &format!("f{}.png", i), &hash, parent.map(|f| f.id)).await);
    }

    let moved = tree
        .update(a.id, FolderPatch::move_to(Some(target.id)), None)
        .await
        .unwrap();
    assert_eq!(moved.path, "/4/1");

    let expected = |old: &str| rebase(old, &a.path, &moved.path).unwrap_or_else(|| old.to_string());
    for before in &all {
        let after = tree.find_one(before.id).await.unwrap().folder;
        assert_eq!(after.path, expected(&before.path), "folder {}", before.name);
    }
    for before in &placed {
        let after = files.find_one(before.uuid.clone()).await.unwrap();
        assert_eq!(after.folder_path, expected(&before.folder_path), "file {}", before.name);
    }
}

#[tokio::test]
async fn test_move_to_root_with_rename() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let a = folder(&tree, "A", None).await;
    let b = folder(&tree, "B", Some(a.id)).await;
    let c = folder(&tree, "C", Some(b.id)).await;

    let patch = FolderPatch {
        name: Some("Top".to_string()),
        parent: Some(None),
    };
    let moved = tree.update(b.id, patch, None).await.unwrap();
    assert_eq!(moved.name, "Top");
    assert_eq!(moved.path, "/2");
    assert_eq!(moved.parent, None);
    assert_eq!(tree.find_one(c.id).await.unwrap().folder.path, "/2/3");

    let roots: Vec<String> = tree
        .find(None)
        .await
        .unwrap()
        .into_iter()
        .map(|summary| summary.folder.name)
        .collect();
    assert_eq!(roots, vec!["A".to_string(), "Top".to_string()]);
}

#[tokio::test]
async fn test_move_rejections_leave_tree_intact() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let a = folder(&tree, "A", None).await;
    let b = folder(&tree, "B", Some(a.id)).await;
    let c = folder(&tree, "C", Some(b.id)).await;
    let other = folder(&tree, "B", None).await;

    let err = tree
        .update(a.id, FolderPatch::move_to(Some(c.id)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::InvalidMove(_))
    ));

    let err = tree
        .update(a.id, FolderPatch::move_to(Some(a.id)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::InvalidMove(_))
    ));

    let err = tree
        .update(a.id, FolderPatch::move_to(Some(999)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::ParentFolderNotFound(999))
    ));

    // A root-level "B" already exists
    let err = tree
        .update(b.id, FolderPatch::move_to(None), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::DuplicateFolderName(_))
    ));

    assert_eq!(tree.find_one(a.id).await.unwrap().folder.path, "/1");
    assert_eq!(tree.find_one(b.id).await.unwrap().folder.path, "/1/2");
    assert_eq!(tree.find_one(c.id).await.unwrap().folder.path, "/1/2/3");
    assert_eq!(tree.find_one(other.id).await.unwrap().folder.path, "/4");
}

#[tokio::test]
async fn test_failed_move_rolls_back_every_path() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db.clone());
    let files = FileRepository::new(db.clone());

    let a = folder(&tree, "A", None).await;
    let b = folder(&tree, "B", Some(a.id)).await;
    let d = folder(&tree, "D", None).await;
    let in_b = file(&files, "b.png", "bb01", Some(b.id)).await;

    // Fail the last statement of the move, after folder paths were already rewritten
    {
        let mut conn = db.connection().unwrap();
        diesel::sql_query(
            "CREATE TRIGGER fail_file_move BEFORE UPDATE OF folder_path ON files \
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END",
        )
        .execute(&mut *conn)
        .unwrap();
    }

    let err = tree
        .update(a.id, FolderPatch::move_to(Some(d.id)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.library_kind(),
        Some(LibraryErrorKind::FolderMoveFailed(_))
    ));

    let a_after = tree.find_one(a.id).await.unwrap().folder;
    assert_eq!(a_after.path, "/1");
    assert_eq!(a_after.parent, None);
    assert_eq!(tree.find_one(b.id).await.unwrap().folder.path, "/1/2");
    assert_eq!(files.find_one(in_b.uuid).await.unwrap().folder_path, "/1/2");
    assert_eq!(tree.find_one(d.id).await.unwrap().child_count, 0);
}

#[tokio::test]
async fn test_delete_scenario_reports_counts() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db.clone());
    let files = FileRepository::new(db);

    let photos = folder(&tree, "Photos", None).await;
    let year = folder(&tree, "2024", Some(photos.id)).await;
    let keep = folder(&tree, "Keep", None).await;
    let first = file(&files, "1.png", "0101", Some(photos.id)).await;
    file(&files, "2.png", "0202", Some(year.id)).await;
    file(&files, "3.png", "0303", Some(year.id)).await;
    let kept = file(&files, "k.png", "0404", Some(keep.id)).await;

    let report = tree.delete(vec![photos.id]).await.unwrap();
    assert_eq!(report.total_folder_number, 2);
    assert_eq!(report.total_file_number, 3);
    assert_eq!(report.folders.len(), 1);
    assert_eq!(report.folders[0].id, photos.id);
    assert_eq!(report.files.len(), 3);

    assert!(tree.find_one(photos.id).await.unwrap_err().is_not_found());
    assert!(tree.find_one(year.id).await.unwrap_err().is_not_found());
    assert!(files.find_one(first.uuid).await.unwrap_err().is_not_found());

    assert_eq!(files.find_one(kept.uuid).await.unwrap().folder_path, "/3");
}

#[tokio::test]
async fn test_delete_nested_targets_counts_once() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let a = folder(&tree, "A", None).await;
    let b = folder(&tree, "B", Some(a.id)).await;

    let report = tree.delete(vec![b.id, a.id]).await.unwrap();
    assert_eq!(report.total_folder_number, 2);
    assert_eq!(report.total_file_number, 0);
}

#[tokio::test]
async fn test_delete_unknown_ids_is_not_found() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db);

    let err = tree.delete(vec![7, 8]).await.unwrap_err();
    assert!(err.is_not_found());

    let err = tree.delete(Vec::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_find_reports_counts_and_path_lookup() {
    let (_dir, db) = open_database();
    let tree = FolderTree::new(db.clone());
    let files = FileRepository::new(db);

    let a = folder(&tree, "A", None).await;
    folder(&tree, "B", Some(a.id)).await;
    folder(&tree, "C", Some(a.id)).await;
    file(&files, "x.png", "ab01", Some(a.id)).await;

    let roots = tree.find(None).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].child_count, 2);
    assert_eq!(roots[0].file_count, 1);

    let children = tree.find(Some(a.id)).await.unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|child| child.child_count == 0));

    let by_path = tree.find_by_path("/1/3".to_string()).await.unwrap();
    assert_eq!(by_path.name, "C");
    assert!(
        tree.find_by_path("/9".to_string())
            .await
            .unwrap_err()
            .is_not_found()
    );
}
