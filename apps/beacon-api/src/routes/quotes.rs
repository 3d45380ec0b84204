//! # Price Quote Route
//!
//! `POST /api/quote` prices an order without storing anything. The mobile
//! app calls it every time the quantity stepper moves.
//!
//! ```text
//! { user_id: 2, quantity: 6, variant: "control" }
//!        │
//!        ▼
//! user 2 ──► country "au" ──► beacon_prices row ──► control column (15.00 AUD)
//!        │                         │
//!        │                    missing row? ──► configured fallback unit price
//!        ▼
//! Quote::new ──► base 90.00, customer 10% ──► discount 9.00, total 81.00
//! ```
//!
//! The preview is fail-soft: a zero or negative quantity is not rejected,
//! it prices to zero. Only confirming an order validates the quantity.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use beacon_core::{PriceVariant, Quote};

use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /api/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub user_id: i64,
    pub quantity: i64,
    /// "control", "variant1" or "variant2"; defaults to control.
    #[serde(default)]
    pub variant: Option<String>,
}

/// Parses an optional variant name, defaulting to control.
pub(crate) fn parse_variant(raw: Option<&str>) -> ApiResult<PriceVariant> {
    match raw {
        Some(name) => Ok(name.parse::<PriceVariant>()?),
        None => Ok(PriceVariant::default()),
    }
}

/// `POST /api/quote`
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<Json<Quote>> {
    let Json(request) = payload?;
    let variant = parse_variant(request.variant.as_deref())?;

    let user = state.require_user(request.user_id).await?;
    let unit_price = state.unit_price_for(&user, variant).await?;

    let quote = Quote::new(
        &user,
        request.quantity,
        variant,
        &unit_price,
        &state.config.currency_symbol,
    );

    debug!(
        user_id = user.id,
        quantity = request.quantity,
        %variant,
        total_cents = quote.pricing.total_price.cents(),
        "Quoted order"
    );

    Ok(Json(quote))
}
