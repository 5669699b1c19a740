//! Ticket storage trait and types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ticket::{Ticket, TicketStatus};

/// Maximum length of the submitter name.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of the submitter email.
pub const MAX_EMAIL_LEN: usize = 100;
/// Maximum length of the ticket subject.
pub const MAX_SUBJECT_LEN: usize = 200;

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Submitted ticket fields are missing or too long.
    #[error("Invalid ticket: {0}")]
    Validation(String),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for TicketError {
    fn from(e: rusqlite::Error) -> Self {
        TicketError::Database(e.to_string())
    }
}

/// Request to create a new ticket.
///
/// Carries only submitter-supplied fields; status and creation date are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
}

impl CreateTicketRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            description: description.into(),
        }
    }

    /// Check required fields and length limits.
    pub fn validate(&self) -> Result<(), TicketError> {
        check_field("name", &self.name, Some(MAX_NAME_LEN))?;
        check_field("email", &self.email, Some(MAX_EMAIL_LEN))?;
        check_field("subject", &self.subject, Some(MAX_SUBJECT_LEN))?;
        check_field("description", &self.description, None)?;
        Ok(())
    }
}

fn check_field(field: &str, value: &str, max_len: Option<usize>) -> Result<(), TicketError> {
    if value.trim().is_empty() {
        return Err(TicketError::Validation(format!("{} is required", field)));
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            return Err(TicketError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}

/// A ticket loaded from sample data, keeping its recorded status and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedTicket {
    pub request: CreateTicketRequest,
    pub status: TicketStatus,
    pub created_date: DateTime<Utc>,
}

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket. The store assigns id, `Open` status and creation date.
    fn insert(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError>;

    /// Get a ticket by ID.
    fn find_by_id(&self, id: i64) -> Result<Option<Ticket>, TicketError>;

    /// List tickets in ascending id order, skipping `skip` and returning at most `take`.
    fn list_ordered_by_id(&self, skip: i64, take: i64) -> Result<Vec<Ticket>, TicketError>;

    /// Mark a ticket closed. Returns `false` when no ticket has this id.
    /// Closing an already closed ticket succeeds.
    fn set_closed(&self, id: i64) -> Result<bool, TicketError>;

    /// Total number of tickets.
    fn count(&self) -> Result<i64, TicketError>;

    /// Bulk insert sample tickets, keeping their status and creation date.
    /// Returns the number of tickets inserted.
    fn import(&self, tickets: &[ImportedTicket]) -> Result<usize, TicketError>;
}
