//! Paginated ticket listing with an in-memory page cache.
//!
//! Requests are normalized into a [`PageRequest`] before anything else, so
//! equivalent requests share a [`PageKey`]. [`TicketListingCache`] holds one
//! snapshot per key with a sliding expiration window and is invalidated after
//! every ticket write.

mod cache;
mod invalidation;
mod page;

pub use cache::{ListingCacheConfig, Page, TicketListingCache};
pub use invalidation::sweep_keys;
pub use page::{PageKey, PageRequest, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
