//! In-memory provider.

use crate::{MediaProvider, ProviderObject, StoredObject};
use bytes::Bytes;
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Buffer-only provider keeping objects in a shared map.
///
/// Useful for ephemeral servers and tests. Clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
    public_base_url: String,
}

impl MemoryProvider {
    /// Create an empty provider serving under `public_base_url`.
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::default(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Whether an object is stored.
    pub fn contains(&self, object: &ProviderObject) -> bool {
        self.objects.read().contains_key(&object.key())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait::async_trait]
impl MediaProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    #[tracing::instrument(skip(self, object, data), fields(hash = %object.hash(), size = data.len()))]
    async fn upload(&self, object: &ProviderObject, data: Bytes) -> FolioResult<StoredObject> {
        let key = object.key();
        self.objects.write().insert(key.clone(), data);
        tracing::debug!(key = %key, "Stored object in memory");
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            provider_metadata: Some(serde_json::json!({ "key": key })),
        })
    }

    async fn read(&self, key: &str) -> FolioResult<Bytes> {
        self.objects
            .read()
            .get(key.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(key.to_string())).into())
    }

    async fn delete(&self, object: &ProviderObject) -> FolioResult<()> {
        self.objects.write().remove(&object.key());
        Ok(())
    }
}
