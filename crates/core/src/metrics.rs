//! Prometheus metrics for core components.
//!
//! This module provides metrics for the ticket listing cache. The server
//! registers them alongside its HTTP metrics.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Listing cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "helpdesk_listing_cache_lookups_total",
            "Total ticket page lookups against the listing cache",
        ),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Invalidation calls triggered by ticket writes.
pub static CACHE_INVALIDATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "helpdesk_listing_cache_invalidations_total",
        "Total listing cache invalidations",
    )
    .unwrap()
});

/// Cached pages dropped, by reason.
pub static CACHE_EVICTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "helpdesk_listing_cache_evictions_total",
            "Total cached ticket pages removed from the listing cache",
        ),
        &["reason"], // "invalidated", "expired", "capacity"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_INVALIDATIONS.clone()),
        Box::new(CACHE_EVICTIONS.clone()),
    ]
}
