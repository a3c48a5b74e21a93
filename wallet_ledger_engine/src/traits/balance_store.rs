use crate::{
    db_types::{Wallet, WalletId, WalletRef},
    traits::LedgerError,
};

/// Durable wallet balances with exclusive, transaction-scoped locks.
///
/// Implementations block while another unit of work holds the lock, up to the configured lock timeout, after which
/// they fail with [`LedgerError::LockTimeout`].
#[allow(async_fn_in_trait)]
pub trait BalanceStore {
    /// Acquires an exclusive lock on the wallet and returns its current state.
    ///
    /// Fails with [`LedgerError::WalletNotFound`] if no such wallet exists.
    async fn lock_and_load(&mut self, wallet: &WalletRef) -> Result<Wallet, LedgerError>;

    /// Persists the wallet's balance as part of the current unit of work. The wallet must have been locked first.
    /// A negative balance is refused.
    async fn save(&mut self, wallet: &Wallet) -> Result<(), LedgerError>;

    /// Locks several wallets following the global lock ordering: ascending wallet id, duplicates removed.
    /// The wallets are returned in that same order.
    ///
    /// Any operation that needs more than one wallet lock must use this method, so that two units of work can never
    /// wait on each other in a cycle.
    async fn lock_in_order(&mut self, ids: &[WalletId]) -> Result<Vec<Wallet>, LedgerError> {
        let mut ordered = ids.to_vec();
        ordered.sort();
        ordered.dedup();
        let mut result = Vec::with_capacity(ordered.len());
        for id in ordered {
            let wallet = self.lock_and_load(&WalletRef::Id(id)).await?;
            result.push(wallet);
        }
        Ok(result)
    }
}
