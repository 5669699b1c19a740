//! Testing utilities for exercising the listing cache and HTTP layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use helpdesk_core::testing::CountingTicketStore;
//!
//! let store = Arc::new(CountingTicketStore::in_memory());
//! let cache = TicketListingCache::new(store.clone(), ListingCacheConfig::default());
//!
//! cache.get_page(PageRequest::default())?;
//! cache.get_page(PageRequest::default())?;
//! assert_eq!(store.list_calls(), 1);
//! ```

mod counting_store;

pub use counting_store::CountingTicketStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::ticket::CreateTicketRequest;

    /// A valid create request with distinguishable fields.
    pub fn ticket_request(n: usize) -> CreateTicketRequest {
        CreateTicketRequest::new(
            format!("Customer {}", n),
            format!("customer{}@example.com", n),
            format!("Issue #{}", n),
            format!("Details for issue number {}", n),
        )
    }
}
