//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, types::Type, Connection};

use super::{CreateTicketRequest, ImportedTicket, Ticket, TicketError, TicketStatus, TicketStore};

const SELECT_COLUMNS: &str = "SELECT id, name, email, subject, description, status, created_date FROM tickets";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite ticket store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TicketError> {
        // AUTOINCREMENT keeps ids strictly increasing, never reusing a value.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Open',
                created_date TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TicketError> {
        self.conn
            .lock()
            .map_err(|_| TicketError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let status_str: String = row.get(5)?;
        let created_date_str: String = row.get(6)?;

        let status = status_str
            .parse::<TicketStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        let created_date = DateTime::parse_from_rfc3339(&created_date_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        Ok(Ticket {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            subject: row.get(3)?,
            description: row.get(4)?,
            status,
            created_date,
        })
    }
}

/// Timestamps are stored at microsecond precision; truncate up front so the
/// value handed back from `insert` matches what a later read returns.
fn now_for_storage() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl TicketStore for SqliteTicketStore {
    fn insert(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError> {
        request.validate()?;

        let conn = self.lock()?;
        let created_date = now_for_storage();
        let status = TicketStatus::Open;

        conn.execute(
            "INSERT INTO tickets (name, email, subject, description, status, created_date) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                request.name,
                request.email,
                request.subject,
                request.description,
                status.as_str(),
                format_timestamp(&created_date),
            ],
        )?;

        Ok(Ticket {
            id: conn.last_insert_rowid(),
            name: request.name,
            email: request.email,
            subject: request.subject,
            description: request.description,
            status,
            created_date,
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ticket>, TicketError> {
        let conn = self.lock()?;

        let result = conn.query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            params![id],
            Self::row_to_ticket,
        );

        match result {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_ordered_by_id(&self, skip: i64, take: i64) -> Result<Vec<Ticket>, TicketError> {
        // A negative LIMIT means "no limit" to SQLite
        if take <= 0 {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY id ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![take, skip.max(0)], Self::row_to_ticket)?;

        let mut tickets = Vec::new();
        for row_result in rows {
            tickets.push(row_result?);
        }

        Ok(tickets)
    }

    fn set_closed(&self, id: i64) -> Result<bool, TicketError> {
        let conn = self.lock()?;

        let changed = conn.execute(
            "UPDATE tickets SET status = ? WHERE id = ?",
            params![TicketStatus::Closed.as_str(), id],
        )?;

        Ok(changed > 0)
    }

    fn count(&self) -> Result<i64, TicketError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?;
        Ok(count)
    }

    fn import(&self, tickets: &[ImportedTicket]) -> Result<usize, TicketError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO tickets (name, email, subject, description, status, created_date) VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for ticket in tickets {
                stmt.execute(params![
                    ticket.request.name,
                    ticket.request.email,
                    ticket.request.subject,
                    ticket.request.description,
                    ticket.status.as_str(),
                    format_timestamp(&ticket.created_date),
                ])?;
            }
        }

        tx.commit()?;
        Ok(tickets.len())
    }
}
