//! # beacon-api: HTTP/JSON Server for Beacon Orders
//!
//! The backend the beacon ordering app talks to. It owns the user directory,
//! the per-country price table and the receipts of confirmed orders, and it
//! prices every order on the server.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        beacon-api                                       │
//! │                                                                         │
//! │  Mobile app ──HTTP/JSON──► axum Router                                 │
//! │                              │  CorsLayer (any origin)                  │
//! │                              │  TraceLayer (request spans)              │
//! │                              ▼                                          │
//! │                         routes::*  ──► beacon-core (pricing, validation)│
//! │                              │                                          │
//! │                              ▼                                          │
//! │                         Arc<AppState> ──► beacon-db (SQLite pool)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - `ApiConfig` from defaults, `beacon-api.toml` and `BEACON_*`
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`state`] - shared handler state
//! - [`routes`] - the handlers

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use crate::config::{ApiConfig, ConfigError};
pub use crate::error::{ApiError, ApiResult, ErrorCode};
pub use crate::state::AppState;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,beacon=debug,sqlx=warn";

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over [`DEFAULT_LOG_FILTER`]. Calling it twice is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
