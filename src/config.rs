//! Configuration for the status cache.
//!
//! Capacity and TTL default to the values the embed service runs with: a
//! thousand servers, each remembered for thirty seconds.

use std::time::Duration;

/// Default maximum number of cached servers.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default time a status snapshot stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Configuration for creating an [`ExpiringCache`](crate::ExpiringCache).
///
/// ```
/// use motd_embed::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new()
///     .max_capacity(500)
///     .ttl(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.get_max_capacity(), Some(500));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When this limit is reached, the least recently used entry is evicted.
    /// `None` means unlimited.
    pub(crate) max_capacity: Option<usize>,

    /// Age after which an entry is no longer returned. `None` disables expiry.
    pub(crate) ttl: Option<Duration>,

    /// Interval of the optional background sweep of expired entries.
    /// `None` leaves expiry purely lazy.
    pub(crate) cleanup_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: Some(DEFAULT_CAPACITY),
            ttl: Some(DEFAULT_TTL),
            cleanup_interval: None,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries. Use 0 for unlimited.
    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = if capacity == 0 { None } else { Some(capacity) };
        self
    }

    /// Set the entry time-to-live. `Duration::ZERO` disables expiry.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = if ttl.is_zero() { None } else { Some(ttl) };
        self
    }

    /// Set the background sweep interval. `Duration::ZERO` disables it.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = if interval.is_zero() {
            None
        } else {
            Some(interval)
        };
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Self {
        self
    }

    pub fn get_max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    pub fn get_ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn get_cleanup_interval(&self) -> Option<Duration> {
        self.cleanup_interval
    }
}
