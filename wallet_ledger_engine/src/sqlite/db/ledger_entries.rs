use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqliteConnection;

use super::TIMESTAMP_FORMAT;
use crate::{
    db_types::{EntryStatus, LedgerEntry, NewLedgerEntry, WalletId},
    traits::LedgerError,
};

pub async fn insert_entry(entry: NewLedgerEntry, conn: &mut SqliteConnection) -> Result<LedgerEntry, LedgerError> {
    let reference = entry.reference.clone();
    let entry = sqlx::query_as(
        r#"
            INSERT INTO ledger_entries
                (reference, kind, status, direction, amount, wallet_id, counterparty_number, description, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(entry.reference)
    .bind(entry.kind)
    .bind(entry.status)
    .bind(entry.direction)
    .bind(entry.amount)
    .bind(entry.wallet_id)
    .bind(entry.counterparty_number)
    .bind(entry.description)
    .bind(entry.payload)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => LedgerError::DuplicateReference(reference),
        _ => LedgerError::from(e),
    })?;
    Ok(entry)
}

/// Takes the write lock on the entry with the given reference and returns its current state.
pub async fn lock_entry(reference: &str, conn: &mut SqliteConnection) -> Result<LedgerEntry, LedgerError> {
    let entry: Option<LedgerEntry> =
        sqlx::query_as("UPDATE ledger_entries SET status = status WHERE reference = $1 RETURNING *")
            .bind(reference)
            .fetch_optional(conn)
            .await?;
    trace!("🗃️ Lock acquired on ledger entry {reference}");
    entry.ok_or_else(|| LedgerError::UnknownReference(reference.to_string()))
}

/// Moves a pending entry to a terminal status. A `None` payload keeps whatever payload the entry already has.
pub async fn finalize_entry(
    reference: &str,
    status: EntryStatus,
    payload: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<LedgerEntry, LedgerError> {
    let entry: Option<LedgerEntry> = sqlx::query_as(
        r#"
            UPDATE ledger_entries
            SET status = $1, payload = COALESCE($2, payload), updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE reference = $3 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(payload)
    .bind(reference)
    .fetch_optional(conn)
    .await?;
    entry.ok_or_else(|| {
        error!("🗃️ Ledger entry {reference} is not pending, so it cannot be moved to {status}");
        LedgerError::ValidationError(format!("Ledger entry {reference} is not pending"))
    })
}

pub async fn fetch_entry(reference: &str, conn: &mut SqliteConnection) -> Result<Option<LedgerEntry>, LedgerError> {
    let entry = sqlx::query_as("SELECT * FROM ledger_entries WHERE reference = $1")
        .bind(reference)
        .fetch_optional(conn)
        .await?;
    Ok(entry)
}

pub async fn fetch_entries_for_wallet(
    wallet_id: WalletId,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    let entries = sqlx::query_as("SELECT * FROM ledger_entries WHERE wallet_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(wallet_id)
        .fetch_all(conn)
        .await?;
    Ok(entries)
}

pub async fn fetch_stale_pending_deposits(
    cutoff: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    let cutoff = cutoff.format(TIMESTAMP_FORMAT).to_string();
    let entries = sqlx::query_as(
        r#"
            SELECT * FROM ledger_entries
            WHERE kind = 'deposit' AND status = 'pending' AND created_at < $1
            ORDER BY created_at ASC, id ASC;
        "#,
    )
    .bind(cutoff)
    .fetch_all(conn)
    .await?;
    Ok(entries)
}
