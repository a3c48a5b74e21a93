use std::fmt::Display;

use ledger_common::MinorUnits;
use serde::{Deserialize, Serialize};

use crate::db_types::{LedgerEntry, Wallet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertWalletResult {
    Created(Wallet),
    /// The owner already has a wallet. Nothing was written.
    OwnerExists,
    /// The proposed wallet number is in use. Nothing was written.
    NumberTaken,
}

/// The result of applying a provider-reported outcome to a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "entry", rename_all = "snake_case")]
pub enum ReconcileResult {
    /// The outcome was applied. The entry is now terminal.
    Applied(LedgerEntry),
    /// The entry was already terminal. Nothing changed.
    AlreadyFinal(LedgerEntry),
    /// The outcome was neither success nor failure. Nothing changed.
    NotActionable(LedgerEntry),
}

impl ReconcileResult {
    pub fn entry(&self) -> &LedgerEntry {
        match self {
            ReconcileResult::Applied(e) | ReconcileResult::AlreadyFinal(e) | ReconcileResult::NotActionable(e) => e,
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, ReconcileResult::Applied(_))
    }
}

impl Display for ReconcileResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileResult::Applied(e) => write!(f, "Deposit {} is now {}", e.reference, e.status),
            ReconcileResult::AlreadyFinal(e) => write!(f, "Deposit {} was already {}", e.reference, e.status),
            ReconcileResult::NotActionable(e) => write!(f, "Deposit {} is still {}", e.reference, e.status),
        }
    }
}

/// Both legs of a committed transfer, plus the source wallet's balance after the debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub debit: LedgerEntry,
    pub credit: LedgerEntry,
    pub source_balance: MinorUnits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInitiated {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpiryResult {
    /// Deposits that were moved to `failed` by this sweep
    pub expired: Vec<LedgerEntry>,
    /// Deposits that settled some other way before the sweep reached them
    pub already_final: Vec<String>,
    /// Deposits that could not be processed, with the reason. They will be picked up by the next sweep.
    pub errors: Vec<(String, String)>,
}

impl ExpiryResult {
    pub fn expired_count(&self) -> usize {
        self.expired.len()
    }

    pub fn total_count(&self) -> usize {
        self.expired.len() + self.already_final.len() + self.errors.len()
    }
}
