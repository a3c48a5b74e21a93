use ledger_common::MinorUnits;
use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Wallet, WalletId, WalletRef},
    traits::{InsertWalletResult, LedgerError},
};

/// Inserts a zero-balance wallet for `owner_id`. An existing wallet for the owner is left untouched.
///
/// The statement must run to completion: a `RETURNING` insert abandoned after its first row leaves the write
/// uncommitted on this connection.
pub async fn insert_wallet(
    owner_id: &str,
    number: &str,
    conn: &mut SqliteConnection,
) -> Result<InsertWalletResult, LedgerError> {
    let result: Result<Vec<Wallet>, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO wallets (owner_id, number, balance) VALUES ($1, $2, 0)
            ON CONFLICT (owner_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(owner_id)
    .bind(number)
    .fetch_all(conn)
    .await;
    match result.map(|rows| rows.into_iter().next()) {
        Ok(Some(wallet)) => Ok(InsertWalletResult::Created(wallet)),
        Ok(None) => Ok(InsertWalletResult::OwnerExists),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            debug!("🗃️ Wallet number {number} is already taken");
            Ok(InsertWalletResult::NumberTaken)
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_wallet_for_owner(owner_id: &str, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet =
        sqlx::query_as("SELECT * FROM wallets WHERE owner_id = $1").bind(owner_id).fetch_optional(conn).await?;
    Ok(wallet)
}

pub async fn fetch_wallet_by_number(number: &str, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet = sqlx::query_as("SELECT * FROM wallets WHERE number = $1").bind(number).fetch_optional(conn).await?;
    Ok(wallet)
}

/// Takes the write lock on the wallet row and returns its current state.
///
/// The self-assignment is a real write as far as SQLite is concerned, so it blocks (up to the busy timeout) while
/// another transaction holds the lock.
pub async fn lock_wallet(wallet: &WalletRef, conn: &mut SqliteConnection) -> Result<Wallet, LedgerError> {
    let result: Option<Wallet> = match wallet {
        WalletRef::Id(id) => {
            sqlx::query_as("UPDATE wallets SET balance = balance WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(conn)
                .await?
        },
        WalletRef::Number(number) => {
            sqlx::query_as("UPDATE wallets SET balance = balance WHERE number = $1 RETURNING *")
                .bind(number)
                .fetch_optional(conn)
                .await?
        },
    };
    trace!("🗃️ Lock acquired on {wallet}");
    result.ok_or_else(|| LedgerError::WalletNotFound(wallet.to_string()))
}

pub async fn update_balance(
    id: WalletId,
    balance: MinorUnits,
    conn: &mut SqliteConnection,
) -> Result<(), LedgerError> {
    if balance.is_negative() {
        error!("🗃️ Refusing to save a negative balance ({balance}) for wallet {id}");
        return Err(LedgerError::ValidationError(format!("Wallet {id} cannot have a negative balance ({balance})")));
    }
    let result = sqlx::query(
        "UPDATE wallets SET balance = $1, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = $2",
    )
    .bind(balance)
    .bind(id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(LedgerError::WalletNotFound(format!("wallet {id}")));
    }
    Ok(())
}
