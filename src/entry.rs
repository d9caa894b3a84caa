//! Cache entry with its expiry deadline.
//!
//! Recency is not stored here; the store's map order tracks it.

use std::time::Instant;

/// A single cached value.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    pub(crate) value: V,

    /// `None` means the entry never expires.
    pub(crate) expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    pub fn new(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Check if this entry has expired at a given time.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
