//! `SqliteDatabase` is a concrete implementation of a wallet ledger backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module. Units of work are SQLite transactions, and are represented by [`SqliteUnitOfWork`].
use std::{fmt::Debug, time::Duration};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::db::{db_url, ledger_entries, new_pool, wallets};
use crate::{
    db_types::{EntryStatus, LedgerEntry, NewLedgerEntry, Wallet, WalletId, WalletRef},
    traits::{BalanceStore, EntryLog, InsertWalletResult, LedgerDatabase, LedgerError, UnitOfWork},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the `WLS_DATABASE_URL` environment variable to locate the database.
    pub async fn new(max_connections: u32, lock_timeout: Duration) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections, lock_timeout).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32, lock_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections, lock_timeout).await?;
        debug!("🗃️ Connection pool for {url} created with {max_connections} connections");
        Ok(Self { url: url.to_string(), pool })
    }

    /// Runs the embedded migrations against this database.
    pub async fn migrate(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LedgerError::StorageError(format!("Could not run migrations. {e}")))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl LedgerDatabase for SqliteDatabase {
    type UnitOfWork = SqliteUnitOfWork;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn begin(&self) -> Result<Self::UnitOfWork, LedgerError> {
        let tx = self.pool.begin().await?;
        Ok(SqliteUnitOfWork { tx })
    }

    async fn insert_wallet(&self, owner_id: &str, number: &str) -> Result<InsertWalletResult, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let result = wallets::insert_wallet(owner_id, number, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_wallet_for_owner(&self, owner_id: &str) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_wallet_for_owner(owner_id, &mut conn).await
    }

    async fn fetch_wallet_by_number(&self, number: &str) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_wallet_by_number(number, &mut conn).await
    }

    async fn fetch_entry(&self, reference: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger_entries::fetch_entry(reference, &mut conn).await
    }

    async fn fetch_entries_for_wallet(&self, wallet_id: WalletId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger_entries::fetch_entries_for_wallet(wallet_id, &mut conn).await
    }

    async fn fetch_stale_pending_deposits(&self, cutoff: DateTime<Utc>) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledger_entries::fetch_stale_pending_deposits(cutoff, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), LedgerError> {
        self.pool.close().await;
        Ok(())
    }
}

/// A single SQLite transaction. Dropping it without calling [`UnitOfWork::commit`] rolls it back.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl Debug for SqliteUnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteUnitOfWork")
    }
}

impl BalanceStore for SqliteUnitOfWork {
    async fn lock_and_load(&mut self, wallet: &WalletRef) -> Result<Wallet, LedgerError> {
        wallets::lock_wallet(wallet, &mut self.tx).await
    }

    async fn save(&mut self, wallet: &Wallet) -> Result<(), LedgerError> {
        wallets::update_balance(wallet.id, wallet.balance, &mut self.tx).await?;
        trace!("🗃️ Wallet {} balance set to {}", wallet.id, wallet.balance);
        Ok(())
    }
}

impl EntryLog for SqliteUnitOfWork {
    async fn lock_entry(&mut self, reference: &str) -> Result<LedgerEntry, LedgerError> {
        ledger_entries::lock_entry(reference, &mut self.tx).await
    }

    async fn append(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerError> {
        let entry = ledger_entries::insert_entry(entry, &mut self.tx).await?;
        trace!(
            "🗃️ Ledger entry {} ({} {}) appended for wallet {}",
            entry.reference,
            entry.kind,
            entry.direction,
            entry.wallet_id
        );
        Ok(entry)
    }

    async fn finalize_entry(
        &mut self,
        reference: &str,
        status: EntryStatus,
        payload: Option<String>,
    ) -> Result<LedgerEntry, LedgerError> {
        ledger_entries::finalize_entry(reference, status, payload, &mut self.tx).await
    }
}

impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(self) -> Result<(), LedgerError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
