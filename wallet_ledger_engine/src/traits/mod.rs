//! # Storage and collaborator contracts
//!
//! This module defines the interfaces the ledger engine is written against.
//!
//! * [`LedgerDatabase`] is the entry point of a backend. It answers read-only queries against committed state and
//!   opens units of work.
//! * [`UnitOfWork`] is a single atomic transaction. It combines the [`BalanceStore`] (wallet locks and balance
//!   updates) and the [`EntryLog`] (ledger entry locks, appends and status transitions). Every lock taken through a
//!   unit of work is exclusive and lasts until the unit of work commits or is dropped.
//! * [`PaymentGateway`] is the narrow interface to the external payment provider.
mod balance_store;
mod data_objects;
mod entry_log;
mod ledger_database;
mod payment_gateway;
mod unit_of_work;

pub use balance_store::BalanceStore;
pub use data_objects::{DepositInitiated, ExpiryResult, InsertWalletResult, ReconcileResult, TransferReceipt};
pub use entry_log::EntryLog;
pub use ledger_database::{LedgerDatabase, LedgerError};
pub use payment_gateway::{AuthorizationHandle, GatewayError, PaymentGateway};
pub use unit_of_work::UnitOfWork;
