//! Cache registry - Central management for all caches.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};

use super::{CacheConfig, TypedCache};

/// Central registry for named typed caches.
///
/// Repositories ask for their caches by name so two handles to the same
/// name share entries.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing cache or create and register a new one.
    ///
    /// If `name` is already registered with different key/value types, the
    /// mismatch is logged and an unregistered cache is returned.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut caches = self.caches.write();

        if let Some(existing) = caches.get(name) {
            if let Some(cache) = existing.cache.downcast_ref::<TypedCache<K, V>>() {
                return cache.clone();
            }
            error!(
                "Cache '{}' already exists with different types: expected {}, got {}",
                name,
                std::any::type_name::<TypedCache<K, V>>(),
                existing.type_name
            );
            return TypedCache::new(name, config);
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);

        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        cache
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_shares_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<u64, bool> = registry.get_or_create("special", CacheConfig::default());
        let b: TypedCache<u64, bool> = registry.get_or_create("special", CacheConfig::default());

        a.insert(10, true);
        assert_eq!(b.get(&10), Some(true));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_type_mismatch_gets_detached_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<u64, bool> = registry.get_or_create("x", CacheConfig::default());
        let b: TypedCache<u64, String> = registry.get_or_create("x", CacheConfig::default());

        a.insert(1, true);
        b.insert(1, "one".to_string());
        assert_eq!(a.get(&1), Some(true));
        assert_eq!(registry.len(), 1);
    }
}
