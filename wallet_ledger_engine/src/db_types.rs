use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use ledger_common::MinorUnits;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

impl ConversionError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}

//--------------------------------------        WalletId       ---------------------------------------------------------
/// Internal identity of a wallet row. This is also the key used for the global lock ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct WalletId(pub i64);

impl Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i64> for WalletId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

//--------------------------------------        WalletRef      ---------------------------------------------------------
/// The two ways a wallet can be addressed: by its internal identity, or by the number shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletRef {
    Id(WalletId),
    Number(String),
}

impl Display for WalletRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletRef::Id(id) => write!(f, "wallet {id}"),
            WalletRef::Number(n) => write!(f, "wallet number {n}"),
        }
    }
}

impl From<WalletId> for WalletRef {
    fn from(id: WalletId) -> Self {
        Self::Id(id)
    }
}

//--------------------------------------         Wallet        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    /// The account that owns this wallet, as identified by the identity layer
    pub owner_id: String,
    /// The stable, externally visible wallet number
    pub number: String,
    /// The balance, in minor units. Never negative.
    pub balance: MinorUnits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       EntryKind       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Funds entering a wallet from the payment provider
    Deposit,
    /// One leg of a wallet-to-wallet transfer
    Transfer,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Deposit => write!(f, "deposit"),
            EntryKind::Transfer => write!(f, "transfer"),
        }
    }
}

//--------------------------------------      EntryStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Waiting on the payment provider to report an outcome
    Pending,
    Success,
    Failed,
}

impl EntryStatus {
    /// Terminal entries never change status or amount again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryStatus::Success | EntryStatus::Failed)
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "pending"),
            EntryStatus::Success => write!(f, "success"),
            EntryStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for EntryStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid entry status: {s}"))),
        }
    }
}

//--------------------------------------       Direction       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// The signed effect of `amount` in this direction on the owning wallet's balance.
    pub fn signed(&self, amount: MinorUnits) -> MinorUnits {
        match self {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Credit => write!(f, "credit"),
            Direction::Debit => write!(f, "debit"),
        }
    }
}

//--------------------------------------      LedgerEntry      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    /// Globally unique idempotency key
    pub reference: String,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub direction: Direction,
    /// Always positive. Use [`LedgerEntry::signed_amount`] for the effect on the wallet.
    pub amount: MinorUnits,
    pub wallet_id: WalletId,
    /// For transfers, the number of the wallet on the other side of the transfer
    pub counterparty_number: Option<String>,
    pub description: Option<String>,
    /// Raw provider payload, or an audit snapshot for transfers
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn signed_amount(&self) -> MinorUnits {
        self.direction.signed(self.amount)
    }
}

//--------------------------------------     NewLedgerEntry    ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub reference: String,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub direction: Direction,
    pub amount: MinorUnits,
    pub wallet_id: WalletId,
    pub counterparty_number: Option<String>,
    pub description: Option<String>,
    pub payload: Option<String>,
}

impl NewLedgerEntry {
    /// A deposit that is waiting on the payment provider.
    pub fn pending_deposit(reference: String, wallet_id: WalletId, amount: MinorUnits) -> Self {
        Self {
            reference,
            kind: EntryKind::Deposit,
            status: EntryStatus::Pending,
            direction: Direction::Credit,
            amount,
            wallet_id,
            counterparty_number: None,
            description: Some("deposit".to_string()),
            payload: None,
        }
    }

    /// One leg of a completed transfer. Transfer legs are created in their final state.
    pub fn transfer_leg(
        reference: String,
        direction: Direction,
        wallet_id: WalletId,
        counterparty_number: String,
        amount: MinorUnits,
    ) -> Self {
        Self {
            reference,
            kind: EntryKind::Transfer,
            status: EntryStatus::Success,
            direction,
            amount,
            wallet_id,
            counterparty_number: Some(counterparty_number),
            description: Some(format!("{direction} transfer")),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: String) -> Self {
        self.payload = Some(payload);
        self
    }
}

//--------------------------------------     DepositOutcome    ---------------------------------------------------------
/// The outcome of a deposit as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositOutcome {
    Success,
    Failed,
    /// Anything else (e.g. "abandoned", "ongoing"). Not actionable, so it never changes state.
    Other(String),
}

impl FromStr for DepositOutcome {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let outcome = match s.trim().to_lowercase().as_str() {
            "success" => Self::Success,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        };
        Ok(outcome)
    }
}

impl From<&str> for DepositOutcome {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(v) => v,
            Err(e) => match e {},
        }
    }
}

impl Display for DepositOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepositOutcome::Success => write!(f, "success"),
            DepositOutcome::Failed => write!(f, "failed"),
            DepositOutcome::Other(s) => write!(f, "{s}"),
        }
    }
}
