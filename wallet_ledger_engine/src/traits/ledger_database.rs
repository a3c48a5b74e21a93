use chrono::{DateTime, Utc};
use ledger_common::MinorUnits;
use thiserror::Error;

use crate::{
    db_types::{EntryKind, LedgerEntry, Wallet, WalletId},
    principal::Permission,
    traits::{GatewayError, InsertWalletResult, UnitOfWork},
};

/// This trait defines the highest level of behaviour for backends supporting the wallet ledger.
///
/// This behaviour includes:
/// * Opening units of work, within which all balance-affecting changes happen.
/// * Provisioning wallets.
/// * Read-only queries. These take no locks and only ever see committed state.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone {
    type UnitOfWork: UnitOfWork;

    /// The URL of the database
    fn url(&self) -> &str;

    /// Starts a new unit of work.
    async fn begin(&self) -> Result<Self::UnitOfWork, LedgerError>;

    /// Inserts a new wallet with a zero balance for `owner_id`, using `number` as its wallet number.
    ///
    /// This never overwrites an existing wallet. If the owner already has a wallet, or the number is taken, the
    /// result says so and nothing is written.
    async fn insert_wallet(&self, owner_id: &str, number: &str) -> Result<InsertWalletResult, LedgerError>;

    async fn fetch_wallet_for_owner(&self, owner_id: &str) -> Result<Option<Wallet>, LedgerError>;

    async fn fetch_wallet_by_number(&self, number: &str) -> Result<Option<Wallet>, LedgerError>;

    async fn fetch_entry(&self, reference: &str) -> Result<Option<LedgerEntry>, LedgerError>;

    /// All entries owned by the wallet, newest first.
    async fn fetch_entries_for_wallet(&self, wallet_id: WalletId) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Pending deposit entries created before `cutoff`, oldest first.
    async fn fetch_stale_pending_deposits(&self, cutoff: DateTime<Utc>) -> Result<Vec<LedgerEntry>, LedgerError>;

    async fn close(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("No wallet exists for {0}")]
    WalletNotFound(String),
    #[error("The recipient wallet {0} does not exist")]
    RecipientNotFound(String),
    #[error("No ledger entry exists with reference {0}")]
    UnknownReference(String),
    #[error("Ledger entry {reference} is a {kind} entry, not a deposit")]
    WrongEntryKind { reference: String, kind: EntryKind },
    #[error("Insufficient balance. {requested} was requested, but only {available} is available")]
    InsufficientBalance { available: MinorUnits, requested: MinorUnits },
    #[error("This operation requires the '{0}' permission")]
    PermissionDenied(Permission),
    #[error("Could not acquire a lock in time. {0}")]
    LockTimeout(String),
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    StorageError(String),
    #[error("The payment gateway could not handle the request. {0}")]
    GatewayError(#[from] GatewayError),
    #[error("A ledger entry with reference {0} already exists")]
    DuplicateReference(String),
}

impl LedgerError {
    /// True for transient failures, where the caller may safely retry the whole operation. The engine itself never
    /// retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::LockTimeout(_) | LedgerError::StorageError(_))
    }
}

// Primary SQLite result codes for a busy or locked database. Extended codes carry these in their low byte.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => {
                LedgerError::LockTimeout("Timed out waiting for a database connection".to_string())
            },
            sqlx::Error::Database(ref err) => {
                let primary_code = err.code().and_then(|c| c.parse::<i64>().ok()).map(|c| c & 0xff);
                match primary_code {
                    Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => LedgerError::LockTimeout(err.message().to_string()),
                    _ => LedgerError::StorageError(e.to_string()),
                }
            },
            _ => LedgerError::StorageError(e.to_string()),
        }
    }
}
