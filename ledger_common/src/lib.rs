mod minor_units;

pub mod helpers;
pub mod op;
mod secret;

pub use minor_units::{MinorUnits, MinorUnitsConversionError, LEDGER_CURRENCY_CODE};
pub use secret::Secret;
