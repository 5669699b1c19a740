//! Common test utilities for driving the API in process.
//!
//! The fixture wires the real router to a SQLite store in a temporary
//! directory, wrapped in a `CountingTicketStore` so tests can tell whether a
//! listing request reached the store or was served from the page cache.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::testing::CountingTicketStore;
use helpdesk_core::{
    CacheConfig, Config, DatabaseConfig, InvalidationMode, SqliteTicketStore, TicketStore,
};
use helpdesk_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use helpdesk_core::testing::fixtures;

/// Test fixture for in-process API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ticket_creation() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/tickets", json!({
///         "name": "Ada", "email": "ada@example.com",
///         "subject": "Login", "description": "Cannot log in"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Store behind the router; counts listing queries
    pub store: Arc<CountingTicketStore>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with default cache settings.
    pub fn new() -> Self {
        Self::with_cache(CacheConfig::default())
    }

    /// Create a fixture using the bounded sweep invalidation.
    pub fn with_sweep_invalidation() -> Self {
        Self::with_cache(CacheConfig {
            invalidation: InvalidationMode::Sweep,
            ..CacheConfig::default()
        })
    }

    /// Create a fixture with custom cache configuration.
    pub fn with_cache(cache: CacheConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            cache,
            ..Config::default()
        };

        let store = Arc::new(CountingTicketStore::new(
            SqliteTicketStore::new(&db_path).expect("Failed to create ticket store"),
        ));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn TicketStore>,
        ));
        let router = create_router(state);

        Self {
            router,
            store,
            temp_dir,
        }
    }

    /// Insert `count` tickets directly into the store, bypassing the API.
    ///
    /// Call before the first listing request; direct inserts do not
    /// invalidate cached pages.
    pub fn insert_tickets(&self, count: usize) {
        for n in 1..=count {
            self.store
                .insert(fixtures::ticket_request(n))
                .expect("Failed to insert ticket");
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request without a body.
    pub async fn put(&self, path: &str) -> TestResponse {
        self.request("PUT", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send an arbitrary request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }
}

/// Ids of a listing response, in order.
pub fn ids(response: &TestResponse) -> Vec<i64> {
    response
        .body
        .as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|ticket| ticket["id"].as_i64().expect("Ticket without id"))
        .collect()
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
