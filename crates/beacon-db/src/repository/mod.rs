//! # Repository Module
//!
//! Database repository implementations for Beacon Orders.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.users().get_by_id(3)                                 │
//! │       ▼                                                                 │
//! │  UserRepository / ReceiptRepository / PriceRepository                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Handlers never write SQL; repositories never price orders.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - User directory CRUD and initialization
//! - [`ReceiptRepository`](receipt::ReceiptRepository) - Append-only receipts
//! - [`PriceRepository`](price::PriceRepository) - Unit prices per country
//!
//! ## Read-Then-Write Transactions
//! Id and receipt-number allocation read a `MAX(...)` and then insert. Those
//! transactions start with `BEGIN IMMEDIATE` so the write lock is taken
//! before the read. A plain deferred `BEGIN` would fail with "database is
//! locked" when another writer commits between the read and the write,
//! because SQLite cannot upgrade a stale read snapshot.

pub mod price;
pub mod receipt;
pub mod user;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

/// Opens a transaction that holds the write lock from its first statement.
///
/// Waits up to the connection's busy timeout for other writers.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
