//! In-process presence store.
//!
//! Used by tests and by `STORE_BACKEND=memory` for local runs. State is lost
//! on restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::models::AfkRecord;
use super::store::{AfkSnapshot, PresenceStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    afk: HashMap<u64, AfkRecord>,
    special: HashSet<u64>,
}

/// Presence store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPresenceStore {
    inner: Mutex<Inner>,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn set_afk(
        &self,
        user_id: u64,
        reason: &str,
        display_name: &str,
        now: i64,
    ) -> Result<AfkRecord, StoreError> {
        let record = AfkRecord::new(user_id, reason, display_name, now);
        self.inner.lock().afk.insert(user_id, record.clone());
        Ok(record)
    }

    async fn remove_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError> {
        Ok(self.inner.lock().afk.remove(&user_id))
    }

    async fn get_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError> {
        Ok(self.inner.lock().afk.get(&user_id).cloned())
    }

    async fn list_afk(&self) -> Result<AfkSnapshot, StoreError> {
        Ok(self.inner.lock().afk.clone())
    }

    async fn is_special(&self, user_id: u64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().special.contains(&user_id))
    }

    async fn toggle_special(&self, user_id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        if inner.special.remove(&user_id) {
            Ok(false)
        } else {
            inner.special.insert(user_id);
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_set_afk_overwrites() {
        let store = MemoryPresenceStore::new();
        store.set_afk(1, "lunch", "Ann", 100).await.unwrap();
        store.set_afk(1, "nap", "Ann", 500).await.unwrap();

        let record = store.get_afk(1).await.unwrap().unwrap();
        assert_eq!(record.since, 500);
        assert_eq!(record.reason, "nap");
        assert_eq!(store.list_afk().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = MemoryPresenceStore::new();
        assert!(store.remove_afk(9).await.unwrap().is_none());

        store.set_afk(9, "away", "Bo", 1).await.unwrap();
        assert!(store.remove_afk(9).await.unwrap().is_some());
        assert!(store.get_afk(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle_is_own_inverse() {
        let store = MemoryPresenceStore::new();
        assert!(!store.is_special(3).await.unwrap());
        assert!(store.toggle_special(3).await.unwrap());
        assert!(store.is_special(3).await.unwrap());
        assert!(!store.toggle_special(3).await.unwrap());
        assert!(!store.is_special(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_special_independent_of_afk() {
        let store = MemoryPresenceStore::new();
        store.toggle_special(4).await.unwrap();
        assert!(store.get_afk(4).await.unwrap().is_none());

        store.set_afk(4, "gone", "Cy", 1).await.unwrap();
        store.remove_afk(4).await.unwrap();
        assert!(store.is_special(4).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_no_lost_update() {
        let store = Arc::new(MemoryPresenceStore::new());
        let mut tasks = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.toggle_special(5).await.unwrap() }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        // Even number of flips lands back where it started
        assert!(!store.is_special(5).await.unwrap());
    }
}
