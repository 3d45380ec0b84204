//! Per-country unit price routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use beacon_core::validation::validate_country_id;
use beacon_core::{BeaconPrice, CoreError};

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/prices`
pub async fn list_prices(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<BeaconPrice>>> {
    Ok(Json(state.db.prices().list().await?))
}

/// `GET /api/prices/{country_id}`
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<String>,
) -> ApiResult<Json<BeaconPrice>> {
    validate_country_id(&country_id)?;

    state
        .db
        .prices()
        .get_by_country(&country_id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::PriceNotFound(country_id).into())
}
