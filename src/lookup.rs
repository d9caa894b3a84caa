//! Status lookup: address validation, cache, and fetch on miss.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::address::{resolve, ServerAddress};
use crate::cache::ExpiringCache;
use crate::error::ResolveResult;
use crate::ping::StatusFetcher;
use crate::status::StatusSnapshot;

/// Resolves addresses and serves their status from the cache, asking the
/// fetcher on a miss.
///
/// The cache lock is taken for the `get` and again for the `set`, never
/// across the fetch. Concurrent misses for one address each run their own
/// fetch and the last to finish wins the cache slot.
#[derive(Clone)]
pub struct StatusLookup {
    cache: ExpiringCache<StatusSnapshot>,
    fetcher: Arc<dyn StatusFetcher>,
}

impl StatusLookup {
    pub fn new(cache: ExpiringCache<StatusSnapshot>, fetcher: Arc<dyn StatusFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Validate `raw` and return the status of the server it names.
    ///
    /// Only address validation can fail. An unreachable server yields
    /// [`StatusSnapshot::offline`], which is cached like any other result.
    pub async fn lookup(&self, raw: &str) -> ResolveResult<StatusSnapshot> {
        let address = resolve(raw).await?;
        Ok(self.lookup_resolved(&address).await)
    }

    /// Cache-or-fetch for an address that already passed validation.
    pub async fn lookup_resolved(&self, address: &ServerAddress) -> StatusSnapshot {
        let key = address.cache_key();

        if let Some(snapshot) = self.cache.get(&key) {
            debug!(%key, "status cache hit");
            return snapshot;
        }

        let snapshot = match self.fetcher.fetch(address).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%key, error = %e, "status fetch failed, reporting server offline");
                StatusSnapshot::offline()
            }
        };

        self.cache.set(key, snapshot.clone());
        snapshot
    }

    pub fn cache(&self) -> &ExpiringCache<StatusSnapshot> {
        &self.cache
    }
}
