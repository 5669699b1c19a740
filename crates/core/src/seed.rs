//! Startup import of sample tickets from a JSON file.
//!
//! The file holds an array of objects with `name`, `email`, `subject`,
//! `description`, and optionally `status` and `createdDate`. PascalCase keys
//! (`Name`, `CreatedDate`, ...) are accepted as well. Imported tickets keep
//! their recorded status and date.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::ticket::{CreateTicketRequest, ImportedTicket, TicketError, TicketStatus, TicketStore};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sample ticket at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error(transparent)]
    Store(#[from] TicketError),
}

/// What a seeding attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had tickets; nothing was imported.
    AlreadyPopulated { existing: i64 },
    /// The seed file does not exist.
    FileMissing,
    /// The file held no tickets.
    Empty,
    /// This many tickets were imported.
    Imported(usize),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SampleTicket {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Email")]
    email: String,
    #[serde(alias = "Subject")]
    subject: String,
    #[serde(alias = "Description")]
    description: String,
    #[serde(default, alias = "Status")]
    status: Option<String>,
    #[serde(default, alias = "CreatedDate")]
    created_date: Option<String>,
}

/// Parse a sample timestamp: RFC 3339, or a bare ISO datetime taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse sample tickets from JSON text.
pub fn parse_sample_tickets(json: &str) -> Result<Vec<ImportedTicket>, SeedError> {
    let samples: Vec<SampleTicket> = serde_json::from_str(json)?;
    let now = Utc::now();

    samples
        .into_iter()
        .enumerate()
        .map(|(index, sample)| -> Result<ImportedTicket, SeedError> {
            let invalid = |reason: String| SeedError::InvalidRecord { index, reason };

            let request = CreateTicketRequest::new(
                sample.name,
                sample.email,
                sample.subject,
                sample.description,
            );
            request.validate().map_err(|e| invalid(e.to_string()))?;

            let status = match sample.status.as_deref() {
                Some(label) => label
                    .parse::<TicketStatus>()
                    .map_err(|e| invalid(e.to_string()))?,
                None => TicketStatus::Open,
            };

            let created_date = match sample.created_date.as_deref() {
                Some(raw) => parse_timestamp(raw)
                    .ok_or_else(|| invalid(format!("unparseable createdDate: {}", raw)))?,
                None => now,
            };

            Ok(ImportedTicket {
                request,
                status,
                created_date,
            })
        })
        .collect()
}

/// Import sample tickets from `path` unless the store already has tickets.
pub fn seed_from_file(store: &dyn TicketStore, path: &Path) -> Result<SeedOutcome, SeedError> {
    let existing = store.count()?;
    if existing > 0 {
        info!(existing, "Store already contains tickets, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated { existing });
    }

    if !path.exists() {
        warn!("Seed file not found at {:?}", path);
        return Ok(SeedOutcome::FileMissing);
    }

    let json = std::fs::read_to_string(path)?;
    let tickets = parse_sample_tickets(&json)?;
    if tickets.is_empty() {
        warn!("Seed file {:?} contains no tickets", path);
        return Ok(SeedOutcome::Empty);
    }

    let imported = store.import(&tickets)?;
    info!(imported, "Seeded ticket store from {:?}", path);
    Ok(SeedOutcome::Imported(imported))
}
