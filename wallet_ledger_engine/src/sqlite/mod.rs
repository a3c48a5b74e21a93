//! SQLite backend for the wallet ledger.
//!
//! Locking model: SQLite has a single writer lock per database. Every unit of work opened by [`SqliteDatabase`]
//! issues a write as its very first statement (a self-assignment `UPDATE ... RETURNING *` on the row it wants to
//! lock, or an `INSERT`). That takes the writer lock before the transaction establishes a read snapshot, so a unit
//! of work never observes stale state and never needs to upgrade a read lock. Competing units of work wait up to
//! the busy timeout, after which they fail with `LockTimeout`.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::{SqliteDatabase, SqliteUnitOfWork};
