//! Per-user async locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by user ID.
///
/// Serializes read-modify-write sequences on the same user while leaving
/// other users untouched. Entries are dropped once nobody holds or waits on them.
#[derive(Clone, Default)]
pub struct KeyLocks {
    locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
}

/// Guard returned by [`KeyLocks::lock`]. Releases the user's lock on drop.
pub struct KeyGuard {
    key: u64,
    locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another task holds it.
    pub async fn lock(&self, key: u64) -> KeyGuard {
        let mutex = self.locks.entry(key).or_default().clone();
        let guard = mutex.lock_owned().await;

        KeyGuard {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    /// Number of users with a live lock entry.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Table + our clone inside the guard are gone; 1 left means nobody else waits
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_serialized() {
        let locks = KeyLocks::new();
        let inside = Arc::new(AtomicU32::new(0));
        let mut tasks = Vec::new();

        for _ in 0..8 {
            let locks = locks.clone();
            let inside = Arc::clone(&inside);
            tasks.push(tokio::spawn(async move {
                let _guard = locks.lock(42).await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_keys_independent() {
        let locks = KeyLocks::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(b.is_ok());
    }
}
