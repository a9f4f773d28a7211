//! Tests for the local filesystem provider.

use bytes::Bytes;
use folio_storage::{
    LocalProvider, MediaProvider, MemoryProvider, ProviderObject, StorageConfig, content_hash,
    provider_from_config,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_buffer_upload_layout_and_url() {
    let temp_dir = TempDir::new().unwrap();
    let provider = LocalProvider::new(temp_dir.path(), "http://localhost:8080/uploads/").unwrap();

    let data = b"Hello, world!";
    let object = ProviderObject::for_bytes(data, Some(".txt".to_string()), "text/plain");
    let stored = provider
        .upload(&object, Bytes::from_static(data))
        .await
        .unwrap();

    let hash = content_hash(data);
    let expected_key = format!("{}/{}.txt", &hash[0..2], hash);
    assert_eq!(
        stored.url,
        format!("http://localhost:8080/uploads/{}", expected_key)
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join(&expected_key)).unwrap(),
        data
    );
}

#[tokio::test]
async fn test_stream_upload_copies_working_file() {
    let temp_dir = TempDir::new().unwrap();
    let provider = LocalProvider::new(temp_dir.path().join("store"), "/uploads").unwrap();
    assert!(provider.supports_streaming());

    let source = temp_dir.path().join("incoming.bin");
    let data = vec![7u8; 64 * 1024];
    std::fs::write(&source, &data).unwrap();

    let object = ProviderObject::for_bytes(&data, Some(".bin".to_string()), "application/octet-stream");
    let stored = provider.upload_stream(&object, &source).await.unwrap();

    assert!(stored.url.starts_with("/uploads/"));
    assert_eq!(std::fs::read(provider.path_for(&object)).unwrap(), data);

    let served = provider.read(&object.key()).await.unwrap();
    assert_eq!(served.len(), data.len());
}

#[tokio::test]
async fn test_identical_content_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let provider = LocalProvider::new(temp_dir.path(), "/uploads").unwrap();

    let data = b"same bytes";
    let object = ProviderObject::for_bytes(data, None, "text/plain");

    let first = provider.upload(&object, Bytes::from_static(data)).await.unwrap();
    let second = provider.upload(&object, Bytes::from_static(data)).await.unwrap();
    assert_eq!(first, second);

    let shard = temp_dir.path().join(&object.hash()[0..2]);
    let entries: Vec<_> = std::fs::read_dir(shard).unwrap().collect();
    assert_eq!(entries.len(), 1, "no temp files left behind");
}

#[tokio::test]
async fn test_delete_tolerates_missing_object() {
    let temp_dir = TempDir::new().unwrap();
    let provider = LocalProvider::new(temp_dir.path(), "/uploads").unwrap();

    let data = b"short lived";
    let object = ProviderObject::for_bytes(data, Some(".txt".to_string()), "text/plain");
    provider.upload(&object, Bytes::from_static(data)).await.unwrap();

    provider.delete(&object).await.unwrap();
    assert!(!provider.path_for(&object).exists());

    // Second delete is a no-op
    provider.delete(&object).await.unwrap();

    let err = provider.read(&object.key()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_read_rejects_traversal() {
    let temp_dir = TempDir::new().unwrap();
    let provider = LocalProvider::new(temp_dir.path(), "/uploads").unwrap();

    assert!(provider.read("../etc/passwd").await.is_err());
    assert!(provider.read("").await.is_err());
}

#[tokio::test]
async fn test_memory_provider_is_buffer_only() {
    let provider = MemoryProvider::new("/uploads");
    assert!(!provider.supports_streaming());

    let object = ProviderObject::for_bytes(b"abc", Some(".txt".to_string()), "text/plain");
    let err = provider
        .upload_stream(&object, std::path::Path::new("/nonexistent"))
        .await
        .unwrap_err();
    assert!(format!("{}", err).contains("Not Implemented"));

    provider.upload(&object, Bytes::from_static(b"abc")).await.unwrap();
    assert!(provider.contains(&object));
    assert_eq!(provider.read(&object.key()).await.unwrap(), Bytes::from_static(b"abc"));

    provider.delete(&object).await.unwrap();
    assert!(provider.is_empty());
}

#[tokio::test]
async fn test_provider_selection() {
    let temp_dir = TempDir::new().unwrap();

    let local = provider_from_config(&StorageConfig::new("local", temp_dir.path(), "/u")).unwrap();
    assert_eq!(local.name(), "local");

    let memory = provider_from_config(&StorageConfig::new("memory", temp_dir.path(), "/u")).unwrap();
    assert_eq!(memory.name(), "memory");

    assert!(provider_from_config(&StorageConfig::new("s3", temp_dir.path(), "/u")).is_err());
}
