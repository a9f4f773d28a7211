//! End-to-end tests driving the API through the HTTP client.

mod common;

use common::{GatedDeletes, TestServer, png_bytes, upload_form};
use folio_client::hashing::hash_bytes;
use folio_client::{HttpTransport, LibraryApi, UploadCoordinator, UploadSource};
use folio_core::{
    AssetKind, ErrorEnvelope, FolderKey, FolderPatch, MediaFile, NewFolder, NewTag, Tag,
};
use folio_server::ServerConfig;
use folio_storage::{MemoryProvider, ProviderObject};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client(server: &TestServer) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(server.base_url.clone(), None).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;
    let body: serde_json::Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
    server.stop().await;
}

#[tokio::test]
async fn test_upload_round_trip() {
    let server = TestServer::start().await;
    let http = client(&server);
    let coordinator = UploadCoordinator::new(http.clone());

    let png = png_bytes(40, 30);
    let handle = coordinator.start_upload(
        UploadSource::from_bytes("sky.png", "image/png", png.clone()),
        FolderKey::root(),
    );
    let file = handle.result().await.unwrap();

    assert_eq!(file.hash, hash_bytes(&png));
    assert_eq!(file.asset_kind, AssetKind::Image);
    assert_eq!(file.ext.as_deref(), Some(".png"));
    assert_eq!((file.width, file.height), (Some(40), Some(30)));
    assert_eq!(file.size_bytes, png.len() as i64);
    assert_eq!(file.folder_path, "/");
    assert_eq!(file.provider, "memory");
    assert!(server.provider.contains(&ProviderObject::from(&file)));

    let listed = http.list_files(&FolderKey::root()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, file.uuid);

    // The listing settles the in-flight entry
    assert_eq!(coordinator.reconcile(&FolderKey::root(), &listed).len(), 1);
    assert!(coordinator.items(&FolderKey::root()).is_empty());

    let served = reqwest::get(server.url(&file.url)).await.unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.headers()["content-type"], "image/png");
    assert_eq!(served.bytes().await.unwrap().as_ref(), png.as_slice());

    server.stop().await;
}

#[tokio::test]
async fn test_uploading_from_disk_streams_the_file() {
    let server = TestServer::start().await;
    let coordinator = UploadCoordinator::new(client(&server));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let data: Vec<u8> = (0..300_000u32).map(|i| b'a' + (i % 26) as u8).collect();
    tokio::fs::write(&path, &data).await.unwrap();

    let source = UploadSource::from_path(&path).await.unwrap();
    let file = coordinator
        .start_upload(source, FolderKey::root())
        .result()
        .await
        .unwrap();
    assert_eq!(file.hash, hash_bytes(&data));
    assert_eq!(file.mime, "text/plain");
    assert_eq!(file.size_bytes, data.len() as i64);

    server.stop().await;
}

#[tokio::test]
async fn test_folder_lifecycle_moves_and_deletes_files() {
    let server = TestServer::start().await;
    let http = client(&server);
    let coordinator = UploadCoordinator::new(http.clone());

    let photos = http
        .create_folder(NewFolder {
            name: "Photos".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    let year = http
        .create_folder(NewFolder {
            name: "2024".to_string(),
            parent: Some(photos.id),
        })
        .await
        .unwrap();
    let archive = http
        .create_folder(NewFolder {
            name: "Archive".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    assert!(year.path.starts_with(&photos.path));

    let folder = FolderKey::new(&year.path);
    let file = coordinator
        .start_upload(
            UploadSource::from_bytes("beach.bin", "application/octet-stream", &b"beach"[..]),
            folder.clone(),
        )
        .result()
        .await
        .unwrap();
    assert_eq!(file.folder, Some(year.id));
    assert_eq!(file.folder_path, year.path);

    let children = http.list_folders(&FolderKey::new(&photos.path)).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].file_count, 1);

    let moved = http
        .update_folder(
            year.id,
            FolderPatch {
                name: None,
                parent: Some(Some(archive.id)),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.path, format!("{}/{}", archive.path, year.path_id));

    let relocated = http.list_files(&FolderKey::new(&moved.path)).await.unwrap();
    assert_eq!(relocated.len(), 1);
    assert_eq!(relocated[0].folder_path, moved.path);
    assert!(http.list_files(&folder).await.is_err());

    let report = http.delete_folders(vec![archive.id]).await.unwrap();
    assert_eq!(report.total_folder_number, 2);
    assert_eq!(report.total_file_number, 1);
    assert!(server.provider.is_empty());

    let remaining = http.list_folders(&FolderKey::root()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].folder.id, photos.id);

    server.stop().await;
}

#[tokio::test]
async fn test_shared_content_survives_deleting_one_copy() {
    let server = TestServer::start().await;
    let http = client(&server);
    let coordinator = UploadCoordinator::new(http.clone());

    let other = http
        .create_folder(NewFolder {
            name: "Other".to_string(),
            parent: None,
        })
        .await
        .unwrap();

    let first = coordinator
        .start_upload(
            UploadSource::from_bytes("a.txt", "text/plain", &b"same"[..]),
            FolderKey::root(),
        )
        .result()
        .await
        .unwrap();
    let second = coordinator
        .start_upload(
            UploadSource::from_bytes("a.txt", "text/plain", &b"same"[..]),
            FolderKey::new(&other.path),
        )
        .result()
        .await
        .unwrap();
    assert_ne!(first.uuid, second.uuid);
    assert_eq!(server.provider.len(), 1);

    let removed: Vec<MediaFile> = reqwest::Client::new()
        .patch(server.url("/files"))
        .json(&json!({"action": "delete", "uuid": first.uuid}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(server.provider.len(), 1);

    let removed: Vec<MediaFile> = reqwest::Client::new()
        .patch(server.url("/files"))
        .json(&json!({"action": "delete", "uuid": [second.uuid]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed.len(), 1);
    assert!(server.provider.is_empty());

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reupload_during_object_cleanup_keeps_object() {
    let memory = MemoryProvider::new("/uploads");
    let gated = GatedDeletes::new(memory.clone());
    let server =
        TestServer::start_with_provider(ServerConfig::default(), memory, gated.clone()).await;
    let coordinator = UploadCoordinator::new(client(&server));
    let source = || UploadSource::from_bytes("note.txt", "text/plain", &b"keep me"[..]);

    let original = coordinator
        .start_upload(source(), FolderKey::root())
        .result()
        .await
        .unwrap();
    let object = ProviderObject::from(&original);
    coordinator.reconcile(&FolderKey::root(), &[original.clone()]);

    let library = server.library.clone();
    let uuid = original.uuid.clone();
    let deleting = tokio::spawn(async move { library.delete_files(vec![uuid]).await });
    gated.wait_delete().await;

    // The row is gone and the object is about to be removed
    let reupload = tokio::spawn(coordinator.start_upload(source(), FolderKey::root()).result());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!reupload.is_finished());

    gated.release(1);
    assert_eq!(deleting.await.unwrap().unwrap().len(), 1);

    let restored = reupload.await.unwrap().unwrap();
    assert_eq!(ProviderObject::from(&restored).key(), object.key());
    assert!(server.provider.contains(&object));

    let served = reqwest::get(server.url(&format!("/uploads/{}", object.key())))
        .await
        .unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().await.unwrap().as_ref(), b"keep me");

    server.stop().await;
}

#[tokio::test]
async fn test_file_metadata_update() {
    let server = TestServer::start().await;
    let http = client(&server);
    let coordinator = UploadCoordinator::new(http.clone());

    let tag = http
        .create_tag(NewTag {
            name: "summer".to_string(),
            files: None,
        })
        .await
        .unwrap();
    let file = coordinator
        .start_upload(
            UploadSource::from_bytes("doc.pdf", "application/pdf", &b"%PDF"[..]),
            FolderKey::root(),
        )
        .result()
        .await
        .unwrap();

    let updated: MediaFile = reqwest::Client::new()
        .patch(server.url("/files"))
        .json(&json!({
            "action": "update",
            "uuid": file.uuid,
            "patch": {
                "name": "report.pdf",
                "caption": "Quarterly",
                "tags": {"set": [tag.uuid]}
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.name, "report.pdf");
    assert_eq!(updated.caption.as_deref(), Some("Quarterly"));
    assert_eq!(updated.tags.len(), 1);

    let tags: Vec<Tag> = http.list_tags().await.unwrap();
    assert_eq!(tags[0].file_count, 1);

    server.stop().await;
}

#[tokio::test]
async fn test_conflicts_are_reported_in_the_envelope() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let body = json!({"name": "Docs"});
    let created = http.post(server.url("/folders")).json(&body).send().await.unwrap();
    assert_eq!(created.status(), 201);

    let clash = http.post(server.url("/folders")).json(&body).send().await.unwrap();
    assert_eq!(clash.status(), 409);
    let envelope: ErrorEnvelope = clash.json().await.unwrap();
    assert_eq!(envelope.status, 409);
    assert_eq!(envelope.error.name, "DuplicateFolderName");
    assert!(envelope.data.is_none());

    let orphan = http
        .post(server.url("/folders"))
        .json(&json!({"name": "Lost", "parent": 999}))
        .send()
        .await
        .unwrap();
    assert_eq!(orphan.status(), 400);

    let missing = http.get(server.url("/folders/999")).send().await.unwrap();
    assert_eq!(missing.status(), 404);

    let object = http.get(server.url("/uploads/ab/absent.png")).send().await.unwrap();
    assert_eq!(object.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_upload_to_unknown_folder_is_not_found() {
    let server = TestServer::start().await;
    let data = b"lost".to_vec();
    let hash = hash_bytes(&data);

    let response = reqwest::Client::new()
        .post(server.url("/files"))
        .multipart(upload_form("lost.txt", "text/plain", data, &hash, "/42"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert!(server.provider.is_empty());

    server.stop().await;
}
