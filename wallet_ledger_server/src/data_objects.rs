use chrono::{DateTime, Utc};
use ledger_common::MinorUnits;
use serde::{Deserialize, Serialize};
use wallet_ledger_engine::{
    db_types::{Direction, EntryKind, EntryStatus, LedgerEntry, Wallet},
    DepositInitiated,
    TransferReceipt,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// In minor units (kobo)
    pub amount: MinorUnits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositResponse {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: String,
}

impl From<DepositInitiated> for DepositResponse {
    fn from(value: DepositInitiated) -> Self {
        Self {
            reference: value.reference,
            authorization_url: value.authorization_url,
            access_code: value.access_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositStatusResponse {
    pub reference: String,
    pub status: EntryStatus,
    pub amount: MinorUnits,
}

impl From<LedgerEntry> for DepositStatusResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self { reference: entry.reference, status: entry.status, amount: entry.amount }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletResponse {
    pub wallet_number: String,
    pub balance: MinorUnits,
    pub created_at: DateTime<Utc>,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self { wallet_number: wallet.number, balance: wallet.balance, created_at: wallet.created_at }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: MinorUnits,
    pub wallet_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub wallet_number: String,
    pub amount: MinorUnits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub status: String,
    pub message: String,
    pub reference: String,
    pub balance: MinorUnits,
}

impl From<TransferReceipt> for TransferResponse {
    fn from(receipt: TransferReceipt) -> Self {
        Self {
            status: "success".to_string(),
            message: "Transfer completed".to_string(),
            reference: receipt.debit.reference,
            balance: receipt.source_balance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub direction: Direction,
    pub amount: MinorUnits,
    pub status: EntryStatus,
    pub reference: String,
    pub counterparty: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntry> for TransactionItem {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            kind: entry.kind,
            direction: entry.direction,
            amount: entry.amount,
            status: entry.status,
            reference: entry.reference,
            counterparty: entry.counterparty_number,
            created_at: entry.created_at,
        }
    }
}
