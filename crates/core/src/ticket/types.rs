//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a support ticket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    /// Label used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown ticket status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(TicketStatus::Open),
            "In Progress" => Ok(TicketStatus::InProgress),
            "Closed" => Ok(TicketStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A support request.
///
/// `id`, `status` and `created_date` are owned by the store: they are assigned
/// on insert and never taken from the submitter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Store-assigned identifier, increasing with every insert.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    /// Set by the store at insert time.
    pub created_date: DateTime<Utc>,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }
}
