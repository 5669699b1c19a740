//! Ticket API handlers.
//!
//! Listing goes through the page cache. Creating and closing a ticket write
//! to the store and then invalidate every cached page before responding.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use chrono::SecondsFormat;
use helpdesk_core::{CreateTicketRequest, PageRequest, Ticket, TicketError, TicketStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::metrics::{TICKETS_CLOSED_TOTAL, TICKETS_CREATED_TOTAL};
use crate::state::AppState;

const CLOSED_MESSAGE: &str = "Ticket closed successfully";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a ticket.
///
/// Any `id`, `status` or `createdDate` sent by the client is ignored. Missing
/// and `null` fields both reach validation as empty.
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for listing tickets.
///
/// Kept as raw strings so that non-numeric values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsParams {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl ListTicketsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_optional(
            parse_lenient(self.page_number.as_deref()),
            parse_lenient(self.page_size.as_deref()),
        )
    }
}

/// Parse an integer parameter. Integers beyond `i64` saturate so they are
/// still clamped; anything that is not an integer counts as absent.
fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    let value = raw?.trim();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match value.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) if value.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Ticket as returned by the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_date: String,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            name: ticket.name.clone(),
            email: ticket.email.clone(),
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            status: ticket.status,
            created_date: ticket
                .created_date
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloseTicketResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct TicketErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<TicketErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(TicketErrorResponse {
            error: message.into(),
        }),
    )
}

fn not_found(id: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("Ticket not found: {}", id))
}

fn store_error(e: TicketError) -> ApiError {
    match e {
        TicketError::Validation(_) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        TicketError::Database(_) => {
            error!("Ticket store failure: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List one page of tickets ordered by id
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let page = state
        .listing()
        .get_page(params.page_request())
        .map_err(store_error)?;

    Ok(Json(page.iter().map(TicketResponse::from).collect()))
}

/// Get a ticket by ID. Reads the store directly, bypassing the page cache.
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, ApiError> {
    let Ok(ticket_id) = id.parse::<i64>() else {
        return Err(not_found(&id));
    };

    match state.ticket_store().find_by_id(ticket_id) {
        Ok(Some(ticket)) => Ok(Json(TicketResponse::from(&ticket))),
        Ok(None) => Err(not_found(&id)),
        Err(e) => Err(store_error(e)),
    }
}

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<TicketResponse>), ApiError> {
    let request = CreateTicketRequest::new(
        body.name.unwrap_or_default(),
        body.email.unwrap_or_default(),
        body.subject.unwrap_or_default(),
        body.description.unwrap_or_default(),
    );

    let ticket = state.ticket_store().insert(request).map_err(store_error)?;
    let dropped = state.listing().invalidate_all();

    TICKETS_CREATED_TOTAL.inc();
    info!(ticket_id = ticket.id, dropped_pages = dropped, "Ticket created");

    let location = format!("/api/tickets/{}", ticket.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TicketResponse::from(&ticket)),
    ))
}

/// Close a ticket. Closing an already closed ticket succeeds again.
pub async fn close_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CloseTicketResponse>, ApiError> {
    let Ok(ticket_id) = id.parse::<i64>() else {
        return Err(not_found(&id));
    };

    let found = state
        .ticket_store()
        .set_closed(ticket_id)
        .map_err(store_error)?;
    if !found {
        return Err(not_found(&id));
    }

    let dropped = state.listing().invalidate_all();

    TICKETS_CLOSED_TOTAL.inc();
    info!(ticket_id, dropped_pages = dropped, "Ticket closed");

    Ok(Json(CloseTicketResponse {
        message: CLOSED_MESSAGE.to_string(),
    }))
}
