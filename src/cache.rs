//! The shared status cache.
//!
//! [`ExpiringCache`] is a cheap-to-clone handle over one bounded store. It is
//! created once at startup with an explicit [`CacheConfig`] and handed to
//! whatever needs it; there is no global instance.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::CacheConfig;
use crate::stats::StatsSnapshot;
use crate::storage::Store;

/// A thread-safe key/value cache with a fixed capacity, LRU eviction and a
/// cache-wide time-to-live.
///
/// Each operation takes the internal lock for its own duration only. A
/// caller doing `get`, then some slow work, then `set` does not hold the
/// lock in between, so two callers may both miss and both populate the same
/// key.
///
/// # Example
/// ```
/// use motd_embed::{CacheConfig, ExpiringCache};
/// use std::time::Duration;
///
/// let cache = ExpiringCache::new(
///     CacheConfig::new()
///         .max_capacity(1000)
///         .ttl(Duration::from_secs(30))
///         .build(),
/// );
///
/// cache.set("play.example.com:25565", 42u32);
/// assert_eq!(cache.get("play.example.com:25565"), Some(42));
/// ```
#[derive(Debug)]
pub struct ExpiringCache<V> {
    store: Arc<Store<V>>,
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: Arc::new(Store::new(config)),
        }
    }

    /// Get a value, or `None` if the key is absent or older than the TTL.
    /// A hit makes the key the most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.get(key)
    }

    /// Insert or refresh a value, restarting its TTL. Inserting a new key
    /// into a full cache first evicts the least recently used entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store.set(key, value);
    }

    /// Returns `true` if the key holds a live entry, without touching its
    /// recency.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Number of stored entries. May include expired entries that have not
    /// been read or swept yet.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.store.stats()
    }

    /// Drop every expired entry now. Returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }
}

impl<V: Clone + Send + Sync + 'static> ExpiringCache<V> {
    /// Start the periodic sweep configured by
    /// [`CacheConfig::cleanup_interval`]. Returns `None` when no interval is
    /// set. Must be called inside a Tokio runtime.
    pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
        let period = self.store.config().cleanup_interval?;
        let store = Arc::clone(&self.store);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired();
                if removed > 0 {
                    debug!(removed, "cache sweep finished");
                }
            }
        }))
    }
}

impl<V: Clone> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cache_basic_operations() {
        let cache: ExpiringCache<String> = ExpiringCache::default();

        cache.set("key", "value".to_string());
        assert_eq!(cache.get("key"), Some("value".to_string()));
        assert!(cache.contains("key"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(!cache.contains("key"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_is_clone() {
        let cache1 = ExpiringCache::default();
        cache1.set("key", 1u8);

        let cache2 = cache1.clone();
        assert_eq!(cache2.get("key"), Some(1));

        cache2.set("key2", 2);
        assert_eq!(cache1.get("key2"), Some(2));
    }

    #[test]
    fn test_cache_thread_safety() {
        use std::thread;

        let cache = ExpiringCache::new(CacheConfig::new().max_capacity(50).build());
        let mut handles = vec![];

        for i in 0..10 {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("key_{}", j);
                    cache.set(key.clone(), i * 1000 + j);
                    let _ = cache.get(&key);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 50);
        assert!(!cache.is_empty());
    }

    #[tokio::test]
    async fn test_sweeper_not_spawned_without_interval() {
        let cache: ExpiringCache<u8> = ExpiringCache::default();
        assert!(cache.spawn_sweeper().is_none());
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let cache = ExpiringCache::new(
            CacheConfig::new()
                .ttl(Duration::from_millis(20))
                .cleanup_interval(Duration::from_millis(10))
                .build(),
        );
        cache.set("key", 1u8);

        let handle = cache.spawn_sweeper().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 1);
    }
}
