use crate::traits::{BalanceStore, EntryLog, LedgerError};

/// A single atomic transaction against the store.
///
/// Either every change made through the unit of work becomes visible (on [`UnitOfWork::commit`]), or none does.
/// Dropping a unit of work without committing it rolls it back and releases its locks.
#[allow(async_fn_in_trait)]
pub trait UnitOfWork: BalanceStore + EntryLog {
    async fn commit(self) -> Result<(), LedgerError>;

    async fn rollback(self) -> Result<(), LedgerError>;
}
