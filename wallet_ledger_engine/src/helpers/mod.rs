mod references;
mod wallet_number;

pub use references::{new_deposit_reference, new_transfer_reference, validate_reference};
pub use wallet_number::{generate_wallet_number, is_valid_wallet_number, WALLET_NUMBER_LENGTH};
