//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Create config for per-message hot path.
    /// High capacity, medium TTL for things checked every message.
    pub fn message_context() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(600)), // 10 minutes
            tti: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CacheConfig::with_capacity(5)
            .ttl(Duration::from_secs(1))
            .tti(Duration::from_secs(2));
        assert_eq!(config.max_capacity, 5);
        assert_eq!(config.ttl, Some(Duration::from_secs(1)));
        assert_eq!(config.tti, Some(Duration::from_secs(2)));
    }
}
