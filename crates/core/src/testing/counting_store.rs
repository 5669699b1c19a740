//! Ticket store wrapper that records how often pages are read.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::ticket::{
    CreateTicketRequest, ImportedTicket, SqliteTicketStore, Ticket, TicketError, TicketStore,
};

/// Wraps another store, counting `list_ordered_by_id` calls.
///
/// Lets tests prove a cache hit never reached the store, and can be told to
/// fail the next list call to simulate an unavailable database.
pub struct CountingTicketStore {
    inner: Box<dyn TicketStore>,
    list_calls: AtomicUsize,
    fail_next_list: AtomicBool,
}

impl CountingTicketStore {
    pub fn new(inner: impl TicketStore + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            list_calls: AtomicUsize::new(0),
            fail_next_list: AtomicBool::new(false),
        }
    }

    /// Wrap a fresh in-memory SQLite store.
    pub fn in_memory() -> Self {
        Self::new(SqliteTicketStore::in_memory().expect("in-memory SQLite store"))
    }

    /// Number of page reads that reached the store.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn reset_list_calls(&self) {
        self.list_calls.store(0, Ordering::SeqCst);
    }

    /// Make the next page read return a database error.
    pub fn fail_next_list(&self) {
        self.fail_next_list.store(true, Ordering::SeqCst);
    }
}

impl TicketStore for CountingTicketStore {
    fn insert(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError> {
        self.inner.insert(request)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ticket>, TicketError> {
        self.inner.find_by_id(id)
    }

    fn list_ordered_by_id(&self, skip: i64, take: i64) -> Result<Vec<Ticket>, TicketError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_list.swap(false, Ordering::SeqCst) {
            return Err(TicketError::Database("simulated outage".to_string()));
        }
        self.inner.list_ordered_by_id(skip, take)
    }

    fn set_closed(&self, id: i64) -> Result<bool, TicketError> {
        self.inner.set_closed(id)
    }

    fn count(&self) -> Result<i64, TicketError> {
        self.inner.count()
    }

    fn import(&self, tickets: &[ImportedTicket]) -> Result<usize, TicketError> {
        self.inner.import(tickets)
    }
}
