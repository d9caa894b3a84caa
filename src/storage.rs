//! Internal storage for the expiring cache.
//!
//! Entries live in an `IndexMap` whose order is the recency order: the front
//! is the least recently used entry, the back the most recent. Every read or
//! write moves the touched key to the back, so eviction always pops the
//! front. One mutex guards the whole map and is held only for the duration of
//! a single operation.
//!
//! `move_index` and `shift_remove_index` shift the entries behind the moved
//! slot, so hits and evictions are O(n) in the number of entries.

use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::trace;

use crate::config::CacheConfig;
use crate::entry::Entry;
use crate::stats::{CacheStats, StatsSnapshot};

/// Lock-guarded bounded map. Users go through
/// [`ExpiringCache`](crate::ExpiringCache).
#[derive(Debug)]
pub struct Store<V> {
    entries: Mutex<IndexMap<String, Entry<V>>>,
    config: CacheConfig,
    stats: CacheStats,
}

impl<V: Clone> Store<V> {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = config.max_capacity.unwrap_or_default();
        Self {
            entries: Mutex::new(IndexMap::with_capacity(capacity)),
            config,
            stats: CacheStats::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`. An expired entry is removed and reported
    /// as absent; a live one becomes the most recently used.
    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock();

        let Some(idx) = entries.get_index_of(key) else {
            self.stats.record_miss();
            return None;
        };

        if entries[idx].is_expired_at(now) {
            entries.shift_remove_index(idx);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            trace!(key, "cache entry expired");
            return None;
        }

        let last = entries.len() - 1;
        entries.move_index(idx, last);
        self.stats.record_hit();
        Some(entries[last].value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key.into(), value, Instant::now());
    }

    /// Insert or refresh `key` as of `now`. A new key that would exceed the
    /// capacity first drops expired entries, then evicts least recently used
    /// ones while the map is still full.
    pub(crate) fn set_at(&self, key: String, value: V, now: Instant) {
        let expires_at = self.config.ttl.map(|ttl| now + ttl);
        let entry = Entry::new(value, expires_at);

        let mut entries = self.entries.lock();

        if let Some(max_capacity) = self.config.max_capacity {
            if !entries.contains_key(&key) && entries.len() >= max_capacity {
                self.purge_expired(&mut entries, now);
                while entries.len() >= max_capacity {
                    self.evict_one(&mut entries);
                }
            }
        }

        let (idx, _) = entries.insert_full(key, entry);
        let last = entries.len() - 1;
        entries.move_index(idx, last);
        self.stats.record_insert();
    }

    /// Returns `true` if `key` holds a live entry. Does not affect recency.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> StatsSnapshot {
        let size = self.len();
        self.stats.snapshot(size)
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    pub(crate) fn cleanup_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        self.purge_expired(&mut entries, now)
    }

    fn purge_expired(&self, entries: &mut IndexMap<String, Entry<V>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
            trace!(removed, "swept expired cache entries");
        }
        removed
    }

    fn evict_one(&self, entries: &mut IndexMap<String, Entry<V>>) {
        if let Some((key, _)) = entries.shift_remove_index(0) {
            self.stats.record_eviction();
            trace!(key = %key, "evicted least recently used cache entry");
        }
    }
}
