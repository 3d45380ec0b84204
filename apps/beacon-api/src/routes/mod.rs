//! # HTTP Routes
//!
//! ```text
//! routes/
//! ├── mod.rs       ◄─── You are here (router assembly, shared test setup)
//! ├── health.rs    ◄─── GET /api/health
//! ├── users.rs     ◄─── User directory CRUD + initialize
//! ├── prices.rs    ◄─── Per-country unit prices
//! ├── quotes.rs    ◄─── POST /api/quote (price preview)
//! └── receipts.rs  ◄─── Confirmed orders
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Handler Flow                                         │
//! │                                                                         │
//! │  Mobile client                                                          │
//! │  ─────────────                                                          │
//! │  fetch('/api/quote', { method: 'POST', body: { user_id: 2, ... } })     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn create_quote(                                                 │
//! │      State(state): State<Arc<AppState>>,  ◄── Shared pool + config      │
//! │      payload: Result<Json<QuoteRequest>, JsonRejection>,                │
//! │  ) -> ApiResult<Json<Quote>>                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  200 + JSON body, or ApiError { code, message } with its status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Body extractors are taken as `Result<Json<T>, JsonRejection>` so malformed
//! JSON comes back in the same `{ code, message }` shape as every other error.

pub mod health;
pub mod prices;
pub mod quotes;
pub mod receipts;
pub mod users;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Every `/api` route, still waiting for its state.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/initialize", post(users::initialize_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/prices", get(prices::list_prices))
        .route("/api/prices/{country_id}", get(prices::get_price))
        .route("/api/quote", post(quotes::create_quote))
        .route(
            "/api/receipts",
            get(receipts::list_receipts).post(receipts::create_receipt),
        )
        .route(
            "/api/receipts/{id}",
            get(receipts::get_receipt).delete(receipts::delete_receipt),
        )
}

/// Body returned by delete endpoints.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use beacon_core::fixtures::{sample_prices, sample_users};
    use beacon_db::{Database, DbConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::ApiConfig;
    use crate::state::AppState;

    /// Router over an in-memory database holding the sample users and prices.
    pub async fn seeded_app() -> (Router, Arc<AppState>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().initialize(&sample_users()).await.unwrap();
        for price in sample_prices() {
            db.prices().upsert(&price).await.unwrap();
        }

        let state = Arc::new(AppState::new(db, ApiConfig::default()));
        (crate::router(state.clone()), state)
    }

    /// Router over an empty in-memory database.
    pub async fn empty_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        crate::router(Arc::new(AppState::new(db, ApiConfig::default())))
    }

    /// Sends one request and returns the status and parsed JSON body.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Sends a raw body with a JSON content type.
    pub async fn send_raw(
        app: &Router,
        method: Method,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}
