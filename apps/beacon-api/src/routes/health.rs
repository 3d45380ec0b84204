//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// "connected" or "disconnected".
    pub database: &'static str,
}

/// `GET /api/health`
///
/// Always answers 200; a broken pool shows up in `database`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if state.db.health_check().await {
        "connected"
    } else {
        tracing::warn!("Health check could not reach the database");
        "disconnected"
    };

    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        database,
    })
}
