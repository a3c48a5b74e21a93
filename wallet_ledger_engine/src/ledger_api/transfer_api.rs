use std::fmt::Debug;

use ledger_common::MinorUnits;
use log::*;
use serde_json::json;

use crate::{
    db_types::{Direction, NewLedgerEntry, Wallet, WalletId},
    events::{EventProducers, TransferCompletedEvent},
    helpers::new_transfer_reference,
    ledger_api::ensure_positive,
    principal::{Permission, Principal},
    traits::{BalanceStore, EntryLog, LedgerDatabase, LedgerError, TransferReceipt, UnitOfWork},
};

/// `TransferApi` moves value directly between two wallets.
#[derive(Clone)]
pub struct TransferApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for TransferApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferApi")
    }
}

impl<B> TransferApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> TransferApi<B>
where B: LedgerDatabase
{
    /// Transfers `amount` from the principal's wallet to the wallet with number `destination_number`.
    ///
    /// The debit, the credit and both ledger entries are committed in a single unit of work, or not at all.
    /// Both wallets are locked through [`BalanceStore::lock_in_order`], so two opposing transfers between the same
    /// pair of wallets cannot deadlock.
    ///
    /// Checks are made in this order: permission, amount, source wallet, self-transfer, then (under lock) available
    /// balance and finally the existence of the recipient.
    pub async fn transfer(
        &self,
        principal: &Principal,
        destination_number: &str,
        amount: MinorUnits,
    ) -> Result<TransferReceipt, LedgerError> {
        principal.require(Permission::Transfer)?;
        ensure_positive(amount)?;
        let source = self
            .db
            .fetch_wallet_for_owner(&principal.owner_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(principal.owner_id.clone()))?;
        if source.number == destination_number {
            return Err(LedgerError::ValidationError("You cannot transfer funds to your own wallet".to_string()));
        }
        // Wallet numbers never change, so the id can be resolved before any locks are taken.
        let destination_id = self.db.fetch_wallet_by_number(destination_number).await?.map(|w| w.id);

        let mut uow = self.db.begin().await?;
        let ids: Vec<WalletId> = std::iter::once(source.id).chain(destination_id).collect();
        let mut locked = uow.lock_in_order(&ids).await?;
        let mut source = take_wallet(&mut locked, source.id)
            .ok_or_else(|| LedgerError::WalletNotFound(principal.owner_id.clone()))?;
        if source.balance < amount {
            debug!("🔄️💸️ Wallet {} cannot transfer {amount}. Balance is only {}", source.id, source.balance);
            return Err(LedgerError::InsufficientBalance { available: source.balance, requested: amount });
        }
        let mut destination = destination_id
            .and_then(|id| take_wallet(&mut locked, id))
            .ok_or_else(|| LedgerError::RecipientNotFound(destination_number.to_string()))?;

        source.balance -= amount;
        destination.balance = destination.balance.checked_add(amount).ok_or_else(|| {
            LedgerError::ValidationError(format!("Crediting {amount} to wallet {} overflows", destination.id))
        })?;
        uow.save(&source).await?;
        uow.save(&destination).await?;

        let debit_reference = new_transfer_reference();
        let credit_reference = new_transfer_reference();
        let snapshot = json!({
            "debit_reference": debit_reference,
            "credit_reference": credit_reference,
            "from": source.number,
            "to": destination.number,
            "amount": amount,
        })
        .to_string();
        let debit = NewLedgerEntry::transfer_leg(
            debit_reference,
            Direction::Debit,
            source.id,
            destination.number.clone(),
            amount,
        )
        .with_payload(snapshot.clone());
        let credit = NewLedgerEntry::transfer_leg(
            credit_reference,
            Direction::Credit,
            destination.id,
            source.number.clone(),
            amount,
        )
        .with_payload(snapshot);
        let debit = uow.append(debit).await?;
        let credit = uow.append(credit).await?;
        uow.commit().await?;
        info!(
            "🔄️💸️ Transferred {amount} from wallet {} to wallet {} ({} / {})",
            source.id, destination.id, debit.reference, credit.reference
        );
        self.producers.publish_transfer_completed(TransferCompletedEvent::new(debit.clone(), credit.clone())).await;
        Ok(TransferReceipt { debit, credit, source_balance: source.balance })
    }
}

fn take_wallet(wallets: &mut Vec<Wallet>, id: WalletId) -> Option<Wallet> {
    let pos = wallets.iter().position(|w| w.id == id)?;
    Some(wallets.swap_remove(pos))
}
