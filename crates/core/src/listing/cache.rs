//! In-memory cache in front of the ticket store's page scan.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::invalidation::sweep_keys;
use super::{PageKey, PageRequest};
use crate::config::{CacheConfig, InvalidationMode};
use crate::metrics::{CACHE_EVICTIONS, CACHE_INVALIDATIONS, CACHE_LOOKUPS};
use crate::ticket::{Ticket, TicketError, TicketStore};

/// An immutable snapshot of one page of tickets.
///
/// Shared between the cache and every caller it was served to; nothing can
/// mutate it after population.
pub type Page = Arc<[Ticket]>;

/// Listing cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingCacheConfig {
    /// Idle time after which a page is dropped. Renewed on every hit.
    pub sliding_expiration: Duration,
    pub invalidation: InvalidationMode,
    /// Most pages held at once.
    pub max_entries: usize,
}

impl Default for ListingCacheConfig {
    fn default() -> Self {
        Self {
            sliding_expiration: Duration::from_secs(60),
            invalidation: InvalidationMode::Exact,
            max_entries: 1000,
        }
    }
}

impl From<&CacheConfig> for ListingCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            sliding_expiration: config.sliding_expiration(),
            invalidation: config.invalidation,
            max_entries: config.max_entries,
        }
    }
}

struct CacheEntry {
    tickets: Page,
    last_access: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.last_access) >= window
    }
}

/// Serves pages of tickets in id order, caching each normalized page with a
/// sliding expiration window.
///
/// All map operations run under one lock, including the store read on a
/// miss. Concurrent requests for the same missing page therefore query the
/// store once, and an invalidation can never be overtaken by a page read that
/// started before the write it follows.
pub struct TicketListingCache {
    store: Arc<dyn TicketStore>,
    config: ListingCacheConfig,
    entries: Mutex<HashMap<PageKey, CacheEntry>>,
}

impl TicketListingCache {
    pub fn new(store: Arc<dyn TicketStore>, config: ListingCacheConfig) -> Self {
        Self {
            store,
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    // The map is consistent between operations, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<PageKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the requested page, from cache when fresh, otherwise from the store.
    ///
    /// A hit renews the entry's window and returns the stored snapshot as is.
    /// Store failures are returned to the caller and nothing is cached.
    pub fn get_page(&self, request: PageRequest) -> Result<Page, TicketError> {
        let key = request.key();
        let window = self.config.sliding_expiration;
        let mut entries = self.lock();
        let now = Instant::now();

        if let Some(entry) = entries.get_mut(&key) {
            if !entry.is_expired(now, window) {
                entry.last_access = now;
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!(key = %key, tickets = entry.tickets.len(), "Listing cache hit");
                return Ok(Arc::clone(&entry.tickets));
            }
        }

        if entries.remove(&key).is_some() {
            CACHE_EVICTIONS.with_label_values(&["expired"]).inc();
        }

        CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
        let tickets: Page = self
            .store
            .list_ordered_by_id(request.skip(), request.take())?
            .into();

        Self::purge_expired(&mut entries, now, window);
        while entries.len() >= self.config.max_entries.max(1) {
            if !Self::evict_least_recent(&mut entries) {
                break;
            }
        }
        entries.insert(
            key,
            CacheEntry {
                tickets: Arc::clone(&tickets),
                last_access: now,
            },
        );
        debug!(key = %key, tickets = tickets.len(), "Listing cache populated");

        Ok(tickets)
    }

    fn purge_expired(entries: &mut HashMap<PageKey, CacheEntry>, now: Instant, window: Duration) {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, window));
        let purged = before - entries.len();
        if purged > 0 {
            CACHE_EVICTIONS
                .with_label_values(&["expired"])
                .inc_by(purged as u64);
        }
    }

    fn evict_least_recent(entries: &mut HashMap<PageKey, CacheEntry>) -> bool {
        let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| *key)
        else {
            return false;
        };

        entries.remove(&oldest);
        CACHE_EVICTIONS.with_label_values(&["capacity"]).inc();
        debug!(key = %oldest, "Listing cache full, evicted least recently used page");
        true
    }

    /// Forget cached pages after a ticket write. Returns how many were dropped.
    ///
    /// In `Exact` mode every cached page goes. In `Sweep` mode only the fixed
    /// set from [`sweep_keys`] goes; other pages stay until they expire.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.lock();

        let removed = match self.config.invalidation {
            InvalidationMode::Exact => {
                let removed = entries.len();
                entries.clear();
                removed
            }
            InvalidationMode::Sweep => sweep_keys()
                .filter(|key| entries.remove(key).is_some())
                .count(),
        };

        CACHE_INVALIDATIONS.inc();
        CACHE_EVICTIONS
            .with_label_values(&["invalidated"])
            .inc_by(removed as u64);

        if entries.is_empty() {
            debug!(removed, "Listing cache invalidated");
        } else {
            info!(
                removed,
                remaining = entries.len(),
                "Listing cache sweep left pages outside the swept range"
            );
        }

        removed
    }

    /// Number of pages currently held, including any not yet purged after expiry.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
