use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::traits::LedgerError;

static REFERENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.:\-]{1,100}$").expect("reference pattern is a valid regex"));

pub const DEPOSIT_PREFIX: &str = "DEP";
pub const TRANSFER_PREFIX: &str = "TRF";

pub fn new_deposit_reference() -> String {
    format!("{DEPOSIT_PREFIX}-{}", Uuid::new_v4())
}

pub fn new_transfer_reference() -> String {
    format!("{TRANSFER_PREFIX}-{}", Uuid::new_v4())
}

/// References arrive from the outside world (webhooks, URLs), so they are checked before they reach the store.
pub fn validate_reference(reference: &str) -> Result<(), LedgerError> {
    if REFERENCE_PATTERN.is_match(reference) {
        Ok(())
    } else {
        Err(LedgerError::ValidationError(format!("'{reference}' is not a valid ledger reference")))
    }
}
