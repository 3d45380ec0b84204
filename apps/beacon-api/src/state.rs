//! Shared application state.

use beacon_core::order::UnitPrice;
use beacon_core::{CoreError, Money, PriceVariant, User};
use beacon_db::Database;

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// State shared by every handler through `Arc<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState { db, config }
    }

    /// Loads a user or fails with 404.
    pub async fn require_user(&self, id: i64) -> ApiResult<User> {
        self.db
            .users()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(id).into())
    }

    /// Unit price for a user's country, or the configured fallback.
    pub async fn unit_price_for(&self, user: &User, variant: PriceVariant) -> ApiResult<UnitPrice> {
        let row = self.db.prices().get_by_country(&user.country_id).await?;
        if row.is_none() {
            tracing::debug!(
                country_id = %user.country_id,
                "No price row, using fallback unit price"
            );
        }

        Ok(UnitPrice::resolve(
            row.as_ref(),
            variant,
            Money::from_cents(self.config.fallback_unit_price_cents),
            &self.config.fallback_currency,
        ))
    }
}
