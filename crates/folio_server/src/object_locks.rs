//! Per-hash locks over stored objects.
//!
//! An upload that finds its object already on disk skips the write and only
//! inserts a row. Cleanup decides an object is orphaned from the rows alone.
//! Both paths hold the hash's lock so the orphan check cannot run between
//! another upload's store and its insert.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

type Slot = Arc<tokio::sync::Mutex<()>>;

#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectLocks {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl ObjectLocks {
    /// Wait for exclusive access to objects with content `hash`.
    pub(crate) async fn lock(&self, hash: &str) -> ObjectGuard {
        let slot = self
            .slots
            .lock()
            .entry(hash.to_string())
            .or_default()
            .clone();
        let guard = slot.lock_owned().await;
        ObjectGuard {
            guard: Some(guard),
            hash: hash.to_string(),
            slots: self.slots.clone(),
        }
    }

    /// Hashes with a holder or waiter.
    pub(crate) fn held(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Releases the hash on drop and forgets its slot once nobody waits on it.
#[derive(Debug)]
pub(crate) struct ObjectGuard {
    guard: Option<OwnedMutexGuard<()>>,
    hash: String,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl Drop for ObjectGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut slots = self.slots.lock();
        // Waiters clone the slot under the map lock, so a count of one means
        // only the map still holds it
        if slots
            .get(&self.hash)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.hash);
        }
    }
}
