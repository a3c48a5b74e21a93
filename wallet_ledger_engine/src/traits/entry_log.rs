use crate::{
    db_types::{EntryStatus, LedgerEntry, NewLedgerEntry},
    traits::LedgerError,
};

/// The append-only record of every balance-affecting event.
///
/// Entries are never deleted. The only mutation permitted is the single transition of a pending entry to a terminal
/// status.
#[allow(async_fn_in_trait)]
pub trait EntryLog {
    /// Acquires an exclusive lock on the entry with the given reference and returns it.
    ///
    /// Fails with [`LedgerError::UnknownReference`] if there is no such entry.
    async fn lock_entry(&mut self, reference: &str) -> Result<LedgerEntry, LedgerError>;

    /// Appends a new entry. Fails with [`LedgerError::DuplicateReference`] if the reference is already taken.
    async fn append(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerError>;

    /// Moves a pending entry to `status`, attaching `payload` if one is given.
    ///
    /// Only pending entries can be finalized. The entry should be locked with [`EntryLog::lock_entry`] first.
    async fn finalize_entry(
        &mut self,
        reference: &str,
        status: EntryStatus,
        payload: Option<String>,
    ) -> Result<LedgerEntry, LedgerError>;
}
