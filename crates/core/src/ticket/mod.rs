//! Support tickets and their storage.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteTicketStore;
pub use store::{
    CreateTicketRequest, ImportedTicket, TicketError, TicketStore, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_SUBJECT_LEN,
};
pub use types::{Ticket, TicketStatus, UnknownStatus};
