//! The public ledger API.
//!
//! The deposit, reconciliation and transfer algorithms are written purely against the storage contracts in
//! [`crate::traits`], so any backend that offers atomic units of work with exclusive locks can run them.
pub mod deposit_flow_api;
pub mod transfer_api;
pub mod wallet_api;

use ledger_common::MinorUnits;

use crate::traits::LedgerError;

pub(crate) fn ensure_positive(amount: MinorUnits) -> Result<(), LedgerError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::ValidationError(format!("Amount must be greater than zero, but was {amount}")))
    }
}
