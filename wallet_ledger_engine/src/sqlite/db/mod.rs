//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction as
//! the need arises and call through to the functions without any other changes.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod ledger_entries;
pub mod wallets;

const SQLITE_DB_URL: &str = "sqlite://data/wallet_ledger.db";

/// Timestamps are stored in the same text format SQLite produces with `strftime('%Y-%m-%d %H:%M:%f')`, so that
/// string comparison and chronological comparison agree.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn db_url() -> String {
    let result = env::var("WLS_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ WLS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

/// Creates a connection pool for the ledger.
///
/// `lock_timeout` bounds how long any statement waits on a lock held by another connection, and how long a caller
/// waits for a free connection.
pub async fn new_pool(url: &str, max_connections: u32, lock_timeout: Duration) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(lock_timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(lock_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}
