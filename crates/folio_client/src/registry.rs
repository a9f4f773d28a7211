//! In-flight upload registry, keyed by folder then content hash.

use folio_core::{FolderKey, MediaFile, UploadItem};
use folio_error::{FolioResult, UploadError, UploadErrorKind};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Identifies one registration of a hash.
///
/// The same content may be registered again once an earlier entry was
/// reconciled away, so updates from a finishing upload must only touch the
/// entry it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

#[derive(Debug)]
struct Entry {
    seq: u64,
    item: UploadItem,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    folders: HashMap<FolderKey, HashMap<String, Entry>>,
}

/// Shared map of uploads that have not been superseded by a listing fetch.
///
/// Every operation takes the lock once, so a duplicate check and the
/// registration that follows it cannot interleave with another upload.
#[derive(Debug, Clone, Default)]
pub struct UploadRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl UploadRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item unless its hash is already present in its folder.
    pub fn try_register(&self, item: UploadItem) -> FolioResult<RegistrationId> {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        let folder = inner.folders.entry(item.folder.clone()).or_default();
        if folder.contains_key(&item.hash) {
            return Err(UploadError::new(UploadErrorKind::Duplicate {
                folder: item.folder.to_string(),
                hash: item.hash.clone(),
            })
            .into());
        }
        folder.insert(item.hash.clone(), Entry { seq, item });
        inner.next_seq += 1;
        Ok(RegistrationId(seq))
    }

    /// Apply `f` to the item created by registration `id`. Returns the
    /// updated item, or `None` when that registration is gone.
    pub fn update<F>(
        &self,
        folder: &FolderKey,
        hash: &str,
        id: RegistrationId,
        f: F,
    ) -> Option<UploadItem>
    where
        F: FnOnce(&mut UploadItem),
    {
        let mut inner = self.inner.lock();
        let entry = inner.folders.get_mut(folder)?.get_mut(hash)?;
        if entry.seq != id.0 {
            return None;
        }
        f(&mut entry.item);
        Some(entry.item.clone())
    }

    /// Drop the item created by registration `id`. A newer registration of
    /// the same hash is left in place.
    pub fn remove(&self, folder: &FolderKey, hash: &str, id: RegistrationId) -> Option<UploadItem> {
        let mut inner = self.inner.lock();
        let entries = inner.folders.get_mut(folder)?;
        if entries.get(hash).map(|entry| entry.seq) != Some(id.0) {
            return None;
        }
        let removed = entries.remove(hash).map(|entry| entry.item);
        if entries.is_empty() {
            inner.folders.remove(folder);
        }
        removed
    }

    /// Look up a single item.
    pub fn get(&self, folder: &FolderKey, hash: &str) -> Option<UploadItem> {
        let inner = self.inner.lock();
        inner
            .folders
            .get(folder)
            .and_then(|entries| entries.get(hash))
            .map(|entry| entry.item.clone())
    }

    /// Items of a folder in registration order.
    pub fn items(&self, folder: &FolderKey) -> Vec<UploadItem> {
        let inner = self.inner.lock();
        let Some(entries) = inner.folders.get(folder) else {
            return Vec::new();
        };
        let mut ordered: Vec<&Entry> = entries.values().collect();
        ordered.sort_by_key(|entry| entry.seq);
        ordered.into_iter().map(|entry| entry.item.clone()).collect()
    }

    /// Remove every item of `folder` whose hash appears in a fetched listing.
    ///
    /// Items with other hashes are untouched whatever their status.
    pub fn reconcile(&self, folder: &FolderKey, files: &[MediaFile]) -> Vec<UploadItem> {
        let persisted: HashSet<&str> = files.iter().map(|file| file.hash.as_str()).collect();
        let mut inner = self.inner.lock();
        let Some(entries) = inner.folders.get_mut(folder) else {
            return Vec::new();
        };

        let superseded: Vec<String> = entries
            .keys()
            .filter(|hash| persisted.contains(hash.as_str()))
            .cloned()
            .collect();
        let mut removed: Vec<Entry> = superseded
            .iter()
            .filter_map(|hash| entries.remove(hash))
            .collect();
        if entries.is_empty() {
            inner.folders.remove(folder);
        }

        removed.sort_by_key(|entry| entry.seq);
        removed.into_iter().map(|entry| entry.item).collect()
    }

    /// Total number of registered items across folders.
    pub fn len(&self) -> usize {
        self.inner.lock().folders.values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
