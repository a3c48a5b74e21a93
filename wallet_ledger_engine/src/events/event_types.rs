use ledger_common::MinorUnits;
use serde::{Deserialize, Serialize};

use crate::db_types::{EntryStatus, LedgerEntry};

/// A deposit reached a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSettledEvent {
    pub entry: LedgerEntry,
    /// The owning wallet's balance after the deposit was applied. `None` when the deposit failed, since the wallet
    /// was not touched.
    pub new_balance: Option<MinorUnits>,
}

impl DepositSettledEvent {
    pub fn new(entry: LedgerEntry, new_balance: Option<MinorUnits>) -> Self {
        Self { entry, new_balance }
    }

    pub fn succeeded(&self) -> bool {
        self.entry.status == EntryStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompletedEvent {
    pub debit: LedgerEntry,
    pub credit: LedgerEntry,
}

impl TransferCompletedEvent {
    pub fn new(debit: LedgerEntry, credit: LedgerEntry) -> Self {
        Self { debit, credit }
    }

    pub fn amount(&self) -> MinorUnits {
        self.debit.amount
    }
}
