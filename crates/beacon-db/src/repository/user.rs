//! # User Repository
//!
//! The user directory: numeric ids, optional address fields and an optional
//! negotiated discount.
//!
//! ## Id Assignment
//! ```text
//! POST /api/users { full_name, ... }
//!      │
//!      ▼
//! BEGIN IMMEDIATE                     ← write lock before the read
//!   SELECT COALESCE(MAX(id), 0) + 1   ← next id
//!   INSERT INTO users (id, ...)
//! COMMIT
//! ```
//!
//! ## Initialization
//! `initialize` only writes when the directory is empty, so calling it on
//! every app start is harmless.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::begin_write;
use crate::error::{DbError, DbResult};
use beacon_core::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str = "id, full_name, address1, address2, postal_code, city, \
     country_name, country_id, organisation_id, discount_percent";

/// What `initialize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InitializeOutcome {
    /// The directory was empty and `inserted` users were written.
    Seeded { inserted: usize },
    /// The directory already had `existing` users; nothing was written.
    AlreadyPopulated { existing: i64 },
}

/// Repository for user directory operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists every user ordered by id.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Gets a user by id.
    ///
    /// ## Returns
    /// * `Ok(Some(user))` - User found
    /// * `Ok(None)` - No user with this id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Creates a user with the next free id.
    pub async fn create(&self, new_user: NewUser) -> DbResult<User> {
        let mut tx = begin_write(&self.pool).await?;

        let next_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let user = new_user.into_user(next_id);
        debug!(id = user.id, name = %user.full_name, "Creating user");

        bind_user(
            sqlx::query(&format!(
                "INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            )),
            &user,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = user.id, "User created");
        Ok(user)
    }

    /// Inserts a user with an explicit id.
    ///
    /// ## Errors
    /// `UniqueViolation` when the id is taken.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = user.id, "Inserting user");

        bind_user(
            sqlx::query(&format!(
                "INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            )),
            user,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("user id", user.id),
            other => other,
        })?;

        Ok(())
    }

    /// Applies a partial update and returns the stored user.
    ///
    /// ## Errors
    /// `NotFound` when no user has this id.
    pub async fn update(&self, id: i64, update: UserUpdate) -> DbResult<User> {
        debug!(id = id, "Updating user");

        let mut tx = begin_write(&self.pool).await?;

        let mut user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("User", id))?;

        update.apply_to(&mut user);

        sqlx::query(
            r#"
            UPDATE users SET
                full_name = ?2,
                address1 = ?3,
                address2 = ?4,
                postal_code = ?5,
                city = ?6,
                country_name = ?7,
                country_id = ?8,
                organisation_id = ?9,
                discount_percent = ?10
            WHERE id = ?1
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.address1)
        .bind(&user.address2)
        .bind(&user.postal_code)
        .bind(&user.city)
        .bind(&user.country_name)
        .bind(&user.country_id)
        .bind(user.organisation_id)
        .bind(user.discount_percent)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Deletes a user. Their receipts are kept.
    ///
    /// ## Errors
    /// `NotFound` when no user has this id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Fills an empty directory with `users`.
    ///
    /// Does nothing when at least one user exists. Runs in one transaction,
    /// so a failure leaves the directory empty.
    pub async fn initialize(&self, users: &[User]) -> DbResult<InitializeOutcome> {
        let mut tx = begin_write(&self.pool).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            debug!(existing = existing, "User directory already populated");
            return Ok(InitializeOutcome::AlreadyPopulated { existing });
        }

        let insert_sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );
        for user in users {
            bind_user(sqlx::query(&insert_sql), user)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(inserted = users.len(), "User directory initialized");
        Ok(InitializeOutcome::Seeded {
            inserted: users.len(),
        })
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

/// Binds every user column in `USER_COLUMNS` order.
fn bind_user<'q>(query: SqliteQuery<'q>, user: &'q User) -> SqliteQuery<'q> {
    query
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.address1)
        .bind(&user.address2)
        .bind(&user.postal_code)
        .bind(&user.city)
        .bind(&user.country_name)
        .bind(&user.country_id)
        .bind(user.organisation_id)
        .bind(user.discount_percent)
}

// =============================================================================
// Unit Tests
// =============================================================================
