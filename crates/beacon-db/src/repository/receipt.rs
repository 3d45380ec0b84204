//! # Receipt Repository
//!
//! Append-only store of confirmed orders.
//!
//! ## Snapshot Pattern
//! A receipt copies the user's name, the unit price, the pricing result and
//! the delivery address at confirmation time. Renaming or deleting the user
//! later does not change what the receipt says.
//!
//! ## Receipt Numbers
//! ```text
//! 20240309-DK-0007
//! ├──────┘ ├┘ └──┘
//! │        │   └── sequence within the day (all countries)
//! │        └────── customer country
//! └─────────────── UTC date of confirmation
//! ```
//! The sequence is read and the row written in one `BEGIN IMMEDIATE`
//! transaction, so concurrent confirmations queue on the write lock instead
//! of failing or sharing a number.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::begin_write;
use crate::error::{DbError, DbResult};
use beacon_core::order::receipt_number;
use beacon_core::{DeliveryAddress, NewReceipt, Receipt};

const RECEIPT_COLUMNS: &str = "id, receipt_number, user_id, user_name, quantity, currency, \
     unit_price_cents, base_price_cents, discount_cents, total_cents, discount_applied, \
     delivery_name, delivery_address, delivery_address2, delivery_postal_code, \
     delivery_city, delivery_country, created_at";

/// Flat database row; the delivery address is spread over `delivery_*` columns.
#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: String,
    receipt_number: String,
    user_id: i64,
    user_name: String,
    quantity: i64,
    currency: String,
    unit_price_cents: i64,
    base_price_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    discount_applied: bool,
    delivery_name: String,
    delivery_address: String,
    delivery_address2: Option<String>,
    delivery_postal_code: String,
    delivery_city: String,
    delivery_country: String,
    created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Receipt {
            id: row.id,
            receipt_number: row.receipt_number,
            user_id: row.user_id,
            user_name: row.user_name,
            quantity: row.quantity,
            currency: row.currency,
            unit_price_cents: row.unit_price_cents,
            base_price_cents: row.base_price_cents,
            discount_cents: row.discount_cents,
            total_cents: row.total_cents,
            discount_applied: row.discount_applied,
            delivery_address: DeliveryAddress {
                name: row.delivery_name,
                address: row.delivery_address,
                address2: row.delivery_address2,
                postal_code: row.delivery_postal_code,
                city: row.delivery_city,
                country: row.delivery_country,
            },
            created_at: row.created_at,
        }
    }
}

/// Repository for receipt operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Lists receipts, newest first.
    pub async fn list(&self) -> DbResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed receipts");
        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    /// Lists one user's receipts, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE user_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    /// Gets a receipt by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let row = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Receipt::from))
    }

    /// Stores a priced order and returns the complete receipt.
    ///
    /// ## What This Does
    /// 1. Generates a UUID v4 id and takes the current UTC time
    /// 2. Reads today's highest sequence number
    /// 3. Inserts the receipt with the next number
    pub async fn create(&self, draft: NewReceipt) -> DbResult<Receipt> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let day_prefix = now.format("%Y%m%d").to_string();

        let mut tx = begin_write(&self.pool).await?;

        // "YYYYMMDD-CC-" is 12 characters; the sequence starts at 13
        let sequence: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(CAST(substr(receipt_number, 13) AS INTEGER)), 0) + 1
            FROM receipts
            WHERE receipt_number LIKE ?1 || '-%'
            "#,
        )
        .bind(&day_prefix)
        .fetch_one(&mut *tx)
        .await?;

        let number = receipt_number(now.date_naive(), &draft.country_id, sequence);
        let receipt = draft.into_receipt(id, number, now);

        debug!(
            id = %receipt.id,
            receipt_number = %receipt.receipt_number,
            total_cents = receipt.total_cents,
            "Creating receipt"
        );

        insert_row(&receipt).execute(&mut *tx).await?;
        tx.commit().await?;

        info!(id = %receipt.id, receipt_number = %receipt.receipt_number, "Receipt stored");
        Ok(receipt)
    }

    /// Inserts a receipt that already has its id and number.
    pub async fn insert(&self, receipt: &Receipt) -> DbResult<()> {
        debug!(id = %receipt.id, "Inserting receipt");

        insert_row(receipt)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("receipt id", &receipt.id),
                other => other,
            })?;

        Ok(())
    }

    /// Deletes a receipt.
    ///
    /// ## Errors
    /// `NotFound` when no receipt has this id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting receipt");

        let result = sqlx::query("DELETE FROM receipts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", id));
        }

        Ok(())
    }

    /// Counts receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn insert_row(receipt: &Receipt) -> SqliteQuery<'_> {
    let address = &receipt.delivery_address;

    sqlx::query(
        r#"
        INSERT INTO receipts (
            id, receipt_number, user_id, user_name, quantity, currency,
            unit_price_cents, base_price_cents, discount_cents, total_cents, discount_applied,
            delivery_name, delivery_address, delivery_address2, delivery_postal_code,
            delivery_city, delivery_country, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10, ?11,
            ?12, ?13, ?14, ?15,
            ?16, ?17, ?18
        )
        "#,
    )
    .bind(&receipt.id)
    .bind(&receipt.receipt_number)
    .bind(receipt.user_id)
    .bind(&receipt.user_name)
    .bind(receipt.quantity)
    .bind(&receipt.currency)
    .bind(receipt.unit_price_cents)
    .bind(receipt.base_price_cents)
    .bind(receipt.discount_cents)
    .bind(receipt.total_cents)
    .bind(receipt.discount_applied)
    .bind(&address.name)
    .bind(&address.address)
    .bind(&address.address2)
    .bind(&address.postal_code)
    .bind(&address.city)
    .bind(&address.country)
    .bind(receipt.created_at)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::repository::test_support::TempDbFile;
    use crate::{Database, DbConfig, DbError};
    use beacon_core::fixtures::{sample_prices, sample_users};
    use beacon_core::order::UnitPrice;
    use beacon_core::{Money, NewReceipt, PriceVariant, User};

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn user(id: i64) -> User {
        sample_users().into_iter().find(|u| u.id == id).unwrap()
    }

    fn draft(user: &User, quantity: i64) -> NewReceipt {
        let prices = sample_prices();
        let row = prices.iter().find(|p| p.country_id == user.country_id);
        let unit = UnitPrice::resolve(row, PriceVariant::Control, Money::from_cents(1000), "USD");
        NewReceipt::for_order(user, quantity, &unit, None).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = database().await;

        let receipt = db.receipts().create(draft(&user(1), 6)).await.unwrap();
        assert_eq!(receipt.currency, "CAD");
        assert_eq!(receipt.base_price_cents, 8_100);
        assert_eq!(receipt.discount_cents, 1_215);
        assert_eq!(receipt.total_cents, 6_885);
        assert!(receipt.receipt_number.ends_with("-CA-0001"));

        let stored = db.receipts().get_by_id(&receipt.id).await.unwrap().unwrap();
        assert_eq!(stored.receipt_number, receipt.receipt_number);
        assert_eq!(stored.delivery_address, receipt.delivery_address);
        assert_eq!(stored.pricing(), receipt.pricing());
    }

    #[tokio::test]
    async fn test_receipt_numbers_increase_within_a_day() {
        let db = database().await;

        let first = db.receipts().create(draft(&user(4), 1)).await.unwrap();
        let second = db.receipts().create(draft(&user(3), 2)).await.unwrap();
        let third = db.receipts().create(draft(&user(5), 3)).await.unwrap();

        assert!(first.receipt_number.ends_with("-US-0001"));
        assert!(second.receipt_number.ends_with("-DK-0002"));
        assert!(third.receipt_number.ends_with("-US-0003"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = database().await;

        let old = draft(&user(2), 5).into_receipt(
            uuid::Uuid::new_v4().to_string(),
            "20200101-AU-0001".to_string(),
            Utc::now() - Duration::days(3),
        );
        db.receipts().insert(&old).await.unwrap();

        let newer = db.receipts().create(draft(&user(1), 1)).await.unwrap();
        let newest = db.receipts().create(draft(&user(5), 2)).await.unwrap();

        let ids: Vec<String> = db
            .receipts()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![newest.id, newer.id, old.id]);
    }

    #[tokio::test]
    async fn test_address_without_second_line_round_trips() {
        let db = database().await;

        let receipt = db.receipts().create(draft(&user(3), 1)).await.unwrap();
        let stored = db.receipts().get_by_id(&receipt.id).await.unwrap().unwrap();
        assert_eq!(stored.delivery_address.address, "");
        assert_eq!(stored.delivery_address.address2, None);
        assert_eq!(stored.delivery_address.country, "Denmark");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = database().await;

        let receipt = db.receipts().create(draft(&user(2), 5)).await.unwrap();
        db.receipts().delete(&receipt.id).await.unwrap();

        assert!(db.receipts().get_by_id(&receipt.id).await.unwrap().is_none());
        assert_eq!(db.receipts().count().await.unwrap(), 0);

        let err = db.receipts().delete(&receipt.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_inconsistent_totals_are_rejected() {
        let db = database().await;

        let mut receipt = db.receipts().create(draft(&user(1), 2)).await.unwrap();
        receipt.id = uuid::Uuid::new_v4().to_string();
        receipt.total_cents += 1;

        let err = db.receipts().insert(&receipt).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let db = database().await;

        db.receipts().create(draft(&user(5), 1)).await.unwrap();
        db.receipts().create(draft(&user(4), 1)).await.unwrap();
        db.receipts().create(draft(&user(5), 7)).await.unwrap();

        let receipts = db.receipts().list_for_user(5).await.unwrap();
        assert_eq!(receipts.len(), 2);
        assert!(receipts.iter().all(|r| r.user_id == 5));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_get_distinct_sequences() {
        let file = TempDbFile::new("receipts");
        let db = Database::new(DbConfig::new(file.path()).max_connections(8))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..20i64 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.receipts().create(draft(&user(i % 5 + 1), 1)).await
            }));
        }

        let mut sequences = Vec::new();
        for handle in handles {
            let receipt = handle.await.unwrap().unwrap();
            sequences.push(receipt.receipt_number[12..].to_string());
        }
        sequences.sort();

        let expected: Vec<String> = (1..=20).map(|n| format!("{:04}", n)).collect();
        assert_eq!(sequences, expected);
        assert_eq!(db.receipts().count().await.unwrap(), 20);

        db.close().await;
    }
}
