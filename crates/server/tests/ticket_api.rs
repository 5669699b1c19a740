//! API tests for ticket listing, creation and closing, including the
//! interaction between writes and the listing page cache.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};

use common::{ids, TestFixture};

fn new_ticket(name: &str) -> Value {
    json!({
        "name": name,
        "email": "customer@example.com",
        "subject": "Printer offline",
        "description": "The second floor printer does not respond"
    })
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_empty_store_returns_empty_array() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/tickets").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_list_is_ordered_by_id_and_paged() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(45);

    let first = fixture.get("/api/tickets").await;
    assert_status!(first, StatusCode::OK);
    assert_eq!(ids(&first), (1..=20).collect::<Vec<i64>>());

    let third = fixture.get("/api/tickets?pageNumber=3&pageSize=20").await;
    assert_eq!(ids(&third), (41..=45).collect::<Vec<i64>>());

    let beyond = fixture.get("/api/tickets?pageNumber=9&pageSize=20").await;
    assert_status!(beyond, StatusCode::OK);
    assert_eq!(beyond.body, json!([]));
}

#[tokio::test]
async fn test_repeated_list_served_from_cache() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(5);

    let first = fixture.get("/api/tickets?pageNumber=1&pageSize=20").await;
    let second = fixture.get("/api/tickets?pageNumber=1&pageSize=20").await;

    assert_status!(second, StatusCode::OK);
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(fixture.store.list_calls(), 1);
}

#[tokio::test]
async fn test_out_of_range_parameters_share_normalized_page() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(12);

    let clamped = fixture.get("/api/tickets?pageNumber=0&pageSize=5").await;
    let canonical = fixture.get("/api/tickets?pageNumber=1&pageSize=5").await;

    assert_eq!(ids(&clamped), vec![1, 2, 3, 4, 5]);
    assert_eq!(clamped.bytes, canonical.bytes);
    assert_eq!(fixture.store.list_calls(), 1);
}

#[tokio::test]
async fn test_page_size_capped_at_maximum() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(120);

    let response = fixture.get("/api/tickets?pageNumber=1&pageSize=500").await;

    assert_eq!(ids(&response).len(), 100);
}

#[tokio::test]
async fn test_non_positive_page_size_uses_default() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(30);

    let response = fixture.get("/api/tickets?pageSize=-3").await;

    assert_eq!(ids(&response).len(), 20);
}

#[tokio::test]
async fn test_non_numeric_parameters_treated_as_absent() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(25);

    let response = fixture.get("/api/tickets?pageNumber=abc&pageSize=lots").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(ids(&response), (1..=20).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_integers_beyond_i64_are_clamped() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(150);

    let huge_size = fixture
        .get("/api/tickets?pageSize=99999999999999999999")
        .await;
    assert_status!(huge_size, StatusCode::OK);
    assert_eq!(ids(&huge_size), (1..=100).collect::<Vec<i64>>());

    let huge_page = fixture
        .get("/api/tickets?pageNumber=99999999999999999999&pageSize=10")
        .await;
    assert_status!(huge_page, StatusCode::OK);
    assert_eq!(huge_page.body, json!([]));
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_open_ticket_with_location() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/tickets", new_ticket("Ada")).await;

    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["name"], "Ada");
    assert_eq!(response.body["status"], "Open");
    assert!(response.body["createdDate"].is_string());
    assert_eq!(
        response.headers.get(header::LOCATION).unwrap(),
        "/api/tickets/1"
    );
}

#[tokio::test]
async fn test_create_ignores_client_status_and_date() {
    let fixture = TestFixture::new();
    let mut body = new_ticket("Grace");
    body["id"] = json!(99);
    body["status"] = json!("Closed");
    body["createdDate"] = json!("1999-01-01T00:00:00Z");

    let response = fixture.post("/api/tickets", body).await;

    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["status"], "Open");
    assert_ne!(response.body["createdDate"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_create_invalid_ticket_rejected() {
    let fixture = TestFixture::new();
    fixture.get("/api/tickets").await;

    let mut body = new_ticket("");
    body["subject"] = json!("x".repeat(201));
    let response = fixture.post("/api/tickets", body).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    // Nothing stored, cached page still served
    let list = fixture.get("/api/tickets").await;
    assert_eq!(list.body, json!([]));
    assert_eq!(fixture.store.list_calls(), 1);
}

#[tokio::test]
async fn test_create_missing_fields_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/tickets", json!({ "name": "Only a name" }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_null_fields_rejected_like_missing() {
    let fixture = TestFixture::new();
    let mut body = new_ticket("Ada");
    body["name"] = Value::Null;

    let response = fixture.post("/api/tickets", body).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_create_malformed_json_rejected() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/api/tickets", "{ not json").await;

    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_create_invalidates_cached_pages() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(3);

    let before = fixture.get("/api/tickets").await;
    assert_eq!(ids(&before), vec![1, 2, 3]);

    let created = fixture.post("/api/tickets", new_ticket("Linus")).await;
    assert_status!(created, StatusCode::CREATED);

    let after = fixture.get("/api/tickets").await;
    assert_eq!(ids(&after), vec![1, 2, 3, 4]);
    assert_eq!(fixture.store.list_calls(), 2);
}

// =============================================================================
// Get by id
// =============================================================================

#[tokio::test]
async fn test_get_ticket_by_id() {
    let fixture = TestFixture::new();
    fixture.post("/api/tickets", new_ticket("Barbara")).await;

    let response = fixture.get("/api/tickets/1").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["name"], "Barbara");
    assert_eq!(response.body["email"], "customer@example.com");
}

#[tokio::test]
async fn test_get_unknown_ticket_not_found() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/tickets/99999").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_get_non_numeric_id_not_found() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/tickets/abc").await;

    assert_status!(response, StatusCode::NOT_FOUND);
}

// =============================================================================
// Close
// =============================================================================

#[tokio::test]
async fn test_close_ticket() {
    let fixture = TestFixture::new();
    fixture.post("/api/tickets", new_ticket("Ken")).await;

    let response = fixture.put("/api/tickets/1/close").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["message"], "Ticket closed successfully");

    let ticket = fixture.get("/api/tickets/1").await;
    assert_eq!(ticket.body["status"], "Closed");
}

#[tokio::test]
async fn test_close_is_repeatable() {
    let fixture = TestFixture::new();
    fixture.post("/api/tickets", new_ticket("Dennis")).await;

    let first = fixture.put("/api/tickets/1/close").await;
    let second = fixture.put("/api/tickets/1/close").await;

    assert_status!(first, StatusCode::OK);
    assert_status!(second, StatusCode::OK);
    assert_eq!(second.body["message"], "Ticket closed successfully");
}

#[tokio::test]
async fn test_close_unknown_ticket_not_found() {
    let fixture = TestFixture::new();

    let response = fixture.put("/api/tickets/99999/close").await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = fixture.put("/api/tickets/abc/close").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_close_invalidates_cached_pages() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(2);

    let before = fixture.get("/api/tickets").await;
    assert_eq!(before.body[1]["status"], "Open");

    fixture.put("/api/tickets/2/close").await;

    let after = fixture.get("/api/tickets").await;
    assert_eq!(after.body[1]["status"], "Closed");
    assert_eq!(fixture.store.list_calls(), 2);
}

#[tokio::test]
async fn test_close_unknown_ticket_keeps_cache() {
    let fixture = TestFixture::new();
    fixture.insert_tickets(2);

    fixture.get("/api/tickets").await;
    fixture.put("/api/tickets/42/close").await;
    fixture.get("/api/tickets").await;

    assert_eq!(fixture.store.list_calls(), 1);
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn test_create_list_close_list_flow() {
    let fixture = TestFixture::new();

    let created = fixture.post("/api/tickets", new_ticket("Margaret")).await;
    assert_status!(created, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let listed = fixture.get("/api/tickets?pageNumber=1&pageSize=20").await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["status"], "Open");

    let closed = fixture.put(&format!("/api/tickets/{}/close", id)).await;
    assert_status!(closed, StatusCode::OK);

    let relisted = fixture.get("/api/tickets?pageNumber=1&pageSize=20").await;
    assert_eq!(relisted.body[0]["id"], id);
    assert_eq!(relisted.body[0]["status"], "Closed");
}

// =============================================================================
// Sweep invalidation
// =============================================================================

#[tokio::test]
async fn test_sweep_refreshes_common_pages() {
    let fixture = TestFixture::with_sweep_invalidation();
    fixture.insert_tickets(3);

    fixture.get("/api/tickets?pageNumber=1&pageSize=10").await;
    fixture.post("/api/tickets", new_ticket("Edsger")).await;

    let after = fixture.get("/api/tickets?pageNumber=1&pageSize=10").await;
    assert_eq!(ids(&after), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_sweep_leaves_uncommon_page_sizes_cached() {
    let fixture = TestFixture::with_sweep_invalidation();
    fixture.insert_tickets(3);

    fixture.get("/api/tickets?pageNumber=1&pageSize=7").await;
    fixture.post("/api/tickets", new_ticket("Barbara")).await;

    // Size 7 is outside the swept range and stays stale until it expires
    let after = fixture.get("/api/tickets?pageNumber=1&pageSize=7").await;
    assert_eq!(ids(&after), vec![1, 2, 3]);
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_reports_cache_settings() {
    let fixture = TestFixture::with_sweep_invalidation();

    let response = fixture.get("/api/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["cache"]["sliding_expiration_secs"], 60);
    assert_eq!(response.body["cache"]["invalidation"], "sweep");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/tickets").await;

    let response = fixture.get("/metrics").await;

    assert_status!(response, StatusCode::OK);
    let text = String::from_utf8(response.bytes.to_vec()).unwrap();
    assert!(text.contains("helpdesk_http_requests_total"));
    assert!(text.contains("helpdesk_listing_cache_lookups_total"));
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let fixture = TestFixture::new();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/tickets")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = fixture.send(request).await;

    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}

#[test]
fn test_bundled_sample_tickets_parse() {
    let tickets =
        helpdesk_core::parse_sample_tickets(include_str!("../data/sample_tickets.json")).unwrap();
    assert!(tickets.len() >= 20);
}
