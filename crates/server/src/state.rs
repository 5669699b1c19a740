use std::sync::Arc;

use helpdesk_core::{Config, ListingCacheConfig, TicketListingCache, TicketStore};

/// Shared application state
pub struct AppState {
    config: Config,
    ticket_store: Arc<dyn TicketStore>,
    listing: TicketListingCache,
}

impl AppState {
    /// Build state around a ticket store. The listing cache starts empty.
    pub fn new(config: Config, ticket_store: Arc<dyn TicketStore>) -> Self {
        let listing = TicketListingCache::new(
            Arc::clone(&ticket_store),
            ListingCacheConfig::from(&config.cache),
        );
        Self {
            config,
            ticket_store,
            listing,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ticket_store(&self) -> &dyn TicketStore {
        self.ticket_store.as_ref()
    }

    pub fn listing(&self) -> &TicketListingCache {
        &self.listing
    }
}
