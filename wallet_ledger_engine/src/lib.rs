//! Wallet Ledger Engine
//!
//! The ledger engine is the money-moving core of the wallet service. It mutates wallet balances under three
//! guarantees: no balance ever goes negative, no value is created or destroyed by a transfer, and a payment
//! provider's webhook can never credit a wallet twice.
//!
//! The library is divided into these sections:
//! 1. Storage contracts ([`mod@traits`]). A backend exposes a [`LedgerDatabase`] which hands out [`UnitOfWork`]s.
//!    A unit of work is one atomic transaction that offers exclusive, transaction-scoped locks on wallets
//!    ([`BalanceStore`]) and ledger entries ([`EntryLog`]). Dropping a unit of work without committing rolls it back.
//! 2. The SQLite backend ([`SqliteDatabase`]).
//! 3. The public API ([`DepositFlowApi`], [`TransferApi`] and [`WalletApi`]). The deposit, reconciliation and
//!    transfer algorithms live here and are written purely against the storage contracts.
//!
//! Every operation receives the caller's [`Principal`] explicitly. There is no ambient "current user".
//!
//! The engine also emits events after commits (deposit settled, transfer completed). See [`mod@events`].
mod ledger_api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod principal;
pub mod test_utils;
pub mod traits;

pub use ledger_api::{
    deposit_flow_api::DepositFlowApi,
    transfer_api::TransferApi,
    wallet_api::{WalletApi, WALLET_NUMBER_ATTEMPTS},
};
pub use principal::{Permission, Principal};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase, SqliteUnitOfWork};
pub use traits::{
    AuthorizationHandle,
    BalanceStore,
    DepositInitiated,
    EntryLog,
    ExpiryResult,
    GatewayError,
    InsertWalletResult,
    LedgerDatabase,
    LedgerError,
    PaymentGateway,
    ReconcileResult,
    TransferReceipt,
    UnitOfWork,
};
