use std::fmt::Debug;

use chrono::{Duration, Utc};
use ledger_common::MinorUnits;
use log::*;
use serde_json::json;

use crate::{
    db_types::{DepositOutcome, EntryKind, EntryStatus, NewLedgerEntry, WalletRef},
    events::{DepositSettledEvent, EventProducers},
    helpers::{new_deposit_reference, validate_reference},
    ledger_api::ensure_positive,
    principal::{Permission, Principal},
    traits::{
        BalanceStore,
        DepositInitiated,
        EntryLog,
        ExpiryResult,
        LedgerDatabase,
        LedgerError,
        PaymentGateway,
        ReconcileResult,
        UnitOfWork,
    },
};

/// `DepositFlowApi` handles money entering the ledger from the payment provider: initiating deposits, applying the
/// provider's (possibly duplicated) outcome notifications, and failing deposits the provider never reports on.
pub struct DepositFlowApi<B, G> {
    db: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for DepositFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DepositFlowApi")
    }
}

impl<B, G> DepositFlowApi<B, G> {
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> DepositFlowApi<B, G>
where
    B: LedgerDatabase,
    G: PaymentGateway,
{
    /// Starts a deposit into the principal's wallet.
    ///
    /// A `pending` credit entry is committed first, and only then is the payment provider asked to initialize the
    /// payment. If the provider fails, the entry stays `pending` and will be failed by
    /// [`Self::expire_stale_deposits`] in due course.
    pub async fn initiate_deposit(
        &self,
        principal: &Principal,
        amount: MinorUnits,
    ) -> Result<DepositInitiated, LedgerError> {
        principal.require(Permission::Deposit)?;
        ensure_positive(amount)?;
        let wallet = self
            .db
            .fetch_wallet_for_owner(&principal.owner_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(principal.owner_id.clone()))?;
        let reference = new_deposit_reference();
        let mut uow = self.db.begin().await?;
        uow.append(NewLedgerEntry::pending_deposit(reference.clone(), wallet.id, amount)).await?;
        uow.commit().await?;
        debug!("🔄️💰️ Pending deposit {reference} of {amount} recorded for wallet {}", wallet.id);
        let handle = self.gateway.initialize(amount, &principal.email, &reference).await.map_err(|e| {
            warn!("🔄️💰️ Deposit {reference} could not be initialized with the payment provider. {e}");
            LedgerError::from(e)
        })?;
        info!("🔄️💰️ Deposit {reference} of {amount} initialized for {}", principal.owner_id);
        Ok(DepositInitiated {
            reference,
            authorization_url: handle.authorization_url,
            access_code: handle.access_code,
        })
    }

    /// Applies a provider-reported outcome to the deposit with the given reference, exactly once.
    ///
    /// Everything happens in one unit of work, starting with a lock on the entry. Concurrent deliveries of the same
    /// notification therefore queue up behind one another, and only the first one to find the entry `pending` has
    /// any effect. Later deliveries see a terminal entry and return [`ReconcileResult::AlreadyFinal`].
    ///
    /// Outcomes other than success or failure (e.g. "abandoned") change nothing and return
    /// [`ReconcileResult::NotActionable`].
    pub async fn apply_outcome(
        &self,
        reference: &str,
        outcome: DepositOutcome,
        raw_payload: Option<String>,
    ) -> Result<ReconcileResult, LedgerError> {
        validate_reference(reference)?;
        let mut uow = self.db.begin().await?;
        let entry = uow.lock_entry(reference).await?;
        if entry.kind != EntryKind::Deposit {
            warn!("🔄️💰️ Received a deposit outcome for {reference}, which is a {} entry", entry.kind);
            return Err(LedgerError::WrongEntryKind { reference: reference.to_string(), kind: entry.kind });
        }
        if entry.status.is_terminal() {
            uow.commit().await?;
            if entry.status == EntryStatus::Failed && outcome == DepositOutcome::Success {
                warn!(
                    "🔄️💰️ Deposit {reference} was reported as successful, but it has already failed (possibly by \
                     expiry). The ledger has NOT been credited. This payment needs manual review."
                );
            } else {
                debug!("🔄️💰️ Deposit {reference} is already {}. Ignoring '{outcome}' notification", entry.status);
            }
            return Ok(ReconcileResult::AlreadyFinal(entry));
        }
        let mut wallet = uow.lock_and_load(&WalletRef::Id(entry.wallet_id)).await?;
        let (entry, new_balance) = match outcome {
            DepositOutcome::Success => {
                wallet.balance = wallet.balance.checked_add(entry.amount).ok_or_else(|| {
                    LedgerError::ValidationError(format!("Crediting {} to wallet {} overflows", entry.amount, wallet.id))
                })?;
                uow.save(&wallet).await?;
                let entry = uow.finalize_entry(reference, EntryStatus::Success, raw_payload).await?;
                (entry, Some(wallet.balance))
            },
            DepositOutcome::Failed => {
                let entry = uow.finalize_entry(reference, EntryStatus::Failed, raw_payload).await?;
                (entry, None)
            },
            DepositOutcome::Other(status) => {
                uow.commit().await?;
                debug!("🔄️💰️ Deposit {reference} reported as '{status}'. Nothing to do.");
                return Ok(ReconcileResult::NotActionable(entry));
            },
        };
        uow.commit().await?;
        info!("🔄️💰️ Deposit {reference} of {} is now {}", entry.amount, entry.status);
        self.producers.publish_deposit_settled(DepositSettledEvent::new(entry.clone(), new_balance)).await;
        Ok(ReconcileResult::Applied(entry))
    }

    /// Fails every deposit that has been `pending` for longer than `older_than`.
    ///
    /// Each deposit goes through [`Self::apply_outcome`], so a genuine notification racing the sweep is serialized
    /// against it and exactly one of them takes effect. Failures on individual deposits are collected rather than
    /// aborting the sweep.
    pub async fn expire_stale_deposits(&self, older_than: Duration) -> Result<ExpiryResult, LedgerError> {
        let cutoff = Utc::now() - older_than;
        let stale = self.db.fetch_stale_pending_deposits(cutoff).await?;
        trace!("🔄️🕰️ {} pending deposits were created before {cutoff}", stale.len());
        let mut result = ExpiryResult::default();
        for entry in stale {
            let payload = json!({
                "reason": "expired",
                "pending_since": entry.created_at,
                "expired_at": Utc::now(),
            })
            .to_string();
            match self.apply_outcome(&entry.reference, DepositOutcome::Failed, Some(payload)).await {
                Ok(ReconcileResult::Applied(e)) => result.expired.push(e),
                Ok(other) => result.already_final.push(other.entry().reference.clone()),
                Err(e) => {
                    warn!("🔄️🕰️ Could not expire deposit {}. {e}", entry.reference);
                    result.errors.push((entry.reference, e.to_string()));
                },
            }
        }
        if result.total_count() > 0 {
            info!(
                "🔄️🕰️ Expiry sweep: {} expired, {} already settled, {} errors",
                result.expired.len(),
                result.already_final.len(),
                result.errors.len()
            );
        }
        Ok(result)
    }
}
