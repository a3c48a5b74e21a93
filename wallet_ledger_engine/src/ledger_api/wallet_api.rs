//! Wallet provisioning and the read-only queries.
use std::fmt::Debug;

use ledger_common::MinorUnits;
use log::*;

use crate::{
    db_types::{EntryKind, LedgerEntry, Wallet},
    helpers::{generate_wallet_number, validate_reference},
    principal::{Permission, Principal},
    traits::{InsertWalletResult, LedgerDatabase, LedgerError},
};

/// How many random wallet numbers are tried before wallet creation gives up.
pub const WALLET_NUMBER_ATTEMPTS: usize = 5;

/// The `WalletApi` provides wallet provisioning and read access to balances and ledger entries.
///
/// Queries take no locks and only ever see committed state.
pub struct WalletApi<B> {
    db: B,
}

impl<B: Debug> Debug for WalletApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletApi ({:?})", self.db)
    }
}

impl<B> WalletApi<B>
where B: LedgerDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Fetches the owner's wallet, creating an empty one if it does not exist yet. Calling this repeatedly is safe.
    pub async fn open_wallet(&self, owner_id: &str) -> Result<Wallet, LedgerError> {
        if owner_id.trim().is_empty() {
            return Err(LedgerError::ValidationError("A wallet owner cannot be empty".to_string()));
        }
        if let Some(wallet) = self.db.fetch_wallet_for_owner(owner_id).await? {
            return Ok(wallet);
        }
        for attempt in 1..=WALLET_NUMBER_ATTEMPTS {
            let number = generate_wallet_number();
            match self.db.insert_wallet(owner_id, &number).await? {
                InsertWalletResult::Created(wallet) => {
                    info!("🪪️ Wallet {} ({}) created for {owner_id}", wallet.id, wallet.number);
                    return Ok(wallet);
                },
                InsertWalletResult::OwnerExists => {
                    debug!("🪪️ Another request created the wallet for {owner_id} first");
                    return self
                        .db
                        .fetch_wallet_for_owner(owner_id)
                        .await?
                        .ok_or_else(|| LedgerError::WalletNotFound(owner_id.to_string()));
                },
                InsertWalletResult::NumberTaken => {
                    warn!("🪪️ Wallet number collision for {owner_id} (attempt {attempt}/{WALLET_NUMBER_ATTEMPTS})");
                },
            }
        }
        Err(LedgerError::StorageError(format!(
            "Could not find a free wallet number for {owner_id} after {WALLET_NUMBER_ATTEMPTS} attempts"
        )))
    }

    pub async fn wallet(&self, principal: &Principal) -> Result<Wallet, LedgerError> {
        principal.require(Permission::Read)?;
        self.db
            .fetch_wallet_for_owner(&principal.owner_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(principal.owner_id.clone()))
    }

    pub async fn balance(&self, principal: &Principal) -> Result<MinorUnits, LedgerError> {
        let wallet = self.wallet(principal).await?;
        Ok(wallet.balance)
    }

    /// All entries for the principal's wallet, newest first.
    pub async fn list_transactions(&self, principal: &Principal) -> Result<Vec<LedgerEntry>, LedgerError> {
        let wallet = self.wallet(principal).await?;
        let entries = self.db.fetch_entries_for_wallet(wallet.id).await?;
        trace!("🪪️ {} ledger entries for wallet {}", entries.len(), wallet.id);
        Ok(entries)
    }

    /// The deposit with the given reference. Only deposits into the principal's own wallet are visible; anything
    /// else is reported as an unknown reference, so that references belonging to other users cannot be probed.
    pub async fn deposit_status(&self, principal: &Principal, reference: &str) -> Result<LedgerEntry, LedgerError> {
        let wallet = self.wallet(principal).await?;
        validate_reference(reference)?;
        match self.db.fetch_entry(reference).await? {
            Some(entry) if entry.kind == EntryKind::Deposit && entry.wallet_id == wallet.id => Ok(entry),
            _ => Err(LedgerError::UnknownReference(reference.to_string())),
        }
    }
}
