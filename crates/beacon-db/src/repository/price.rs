//! # Price Repository
//!
//! Unit price per country, one column per experiment variant.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use beacon_core::validation::normalize_country_id;
use beacon_core::BeaconPrice;

/// Repository for the beacon price table.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: SqlitePool,
}

impl PriceRepository {
    /// Creates a new PriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceRepository { pool }
    }

    /// Lists every price row ordered by country.
    pub async fn list(&self) -> DbResult<Vec<BeaconPrice>> {
        let prices = sqlx::query_as::<_, BeaconPrice>(
            r#"
            SELECT country_id, currency, price_control_cents,
                   price_variant1_cents, price_variant2_cents
            FROM beacon_prices
            ORDER BY country_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }

    /// Gets the price row for a country (case-insensitive).
    pub async fn get_by_country(&self, country_id: &str) -> DbResult<Option<BeaconPrice>> {
        let country_id = normalize_country_id(country_id);

        let price = sqlx::query_as::<_, BeaconPrice>(
            r#"
            SELECT country_id, currency, price_control_cents,
                   price_variant1_cents, price_variant2_cents
            FROM beacon_prices
            WHERE country_id = ?1
            "#,
        )
        .bind(&country_id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(country_id = %country_id, found = price.is_some(), "Looked up beacon price");
        Ok(price)
    }

    /// Inserts or replaces a country's price row.
    pub async fn upsert(&self, price: &BeaconPrice) -> DbResult<()> {
        let country_id = normalize_country_id(&price.country_id);
        debug!(country_id = %country_id, "Upserting beacon price");

        sqlx::query(
            r#"
            INSERT INTO beacon_prices (
                country_id, currency, price_control_cents,
                price_variant1_cents, price_variant2_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (country_id) DO UPDATE SET
                currency = excluded.currency,
                price_control_cents = excluded.price_control_cents,
                price_variant1_cents = excluded.price_variant1_cents,
                price_variant2_cents = excluded.price_variant2_cents
            "#,
        )
        .bind(&country_id)
        .bind(&price.currency)
        .bind(price.price_control_cents)
        .bind(price.price_variant1_cents)
        .bind(price.price_variant2_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts price rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM beacon_prices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
