//! Tests for multipart intake and hash verification.

mod common;

use common::{TestServer, png_bytes, upload_form};
use folio_client::hashing::hash_bytes;
use folio_core::{ErrorEnvelope, MediaFile};
use folio_server::ServerConfig;

#[tokio::test]
async fn test_hash_mismatch_is_rejected() {
    let server = TestServer::start().await;
    let form = upload_form("a.txt", "text/plain", b"actual".to_vec(), &hash_bytes(b"claimed"), "root");

    let response = reqwest::Client::new()
        .post(server.url("/files"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let envelope: ErrorEnvelope = response.json().await.unwrap();
    assert_eq!(envelope.error.name, "HashMismatch");
    assert!(server.provider.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_claimed_hash_is_case_insensitive() {
    let server = TestServer::start().await;
    let data = png_bytes(8, 8);
    let claimed = hash_bytes(&data).to_uppercase();

    let response = reqwest::Client::new()
        .post(server.url("/files"))
        .multipart(upload_form("dot.png", "image/png", data.clone(), &claimed, "/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let file: MediaFile = response.json().await.unwrap();
    assert_eq!(file.hash, hash_bytes(&data));
    assert_eq!(file.width, Some(8));

    server.stop().await;
}

#[tokio::test]
async fn test_missing_file_part_is_a_validation_error() {
    let server = TestServer::start().await;
    let form = reqwest::multipart::Form::new().text("hash", "abc");

    let response = reqwest::Client::new()
        .post(server.url("/files"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let envelope: ErrorEnvelope = response.json().await.unwrap();
    assert_eq!(envelope.error.name, "ValidationError");

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let server = TestServer::start_with(ServerConfig::default().with_max_upload_bytes(1024)).await;
    let data = vec![7u8; 4096];
    let hash = hash_bytes(&data);

    let response = reqwest::Client::new()
        .post(server.url("/files"))
        .multipart(upload_form("big.bin", "application/octet-stream", data, &hash, "root"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(server.provider.is_empty());

    server.stop().await;
}
