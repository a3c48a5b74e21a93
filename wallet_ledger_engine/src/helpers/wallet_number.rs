use rand::Rng;

pub const WALLET_NUMBER_LENGTH: usize = 12;

/// A random, 12-digit wallet number. Leading zeros are allowed. Uniqueness is enforced by the store, so callers
/// must be prepared to retry on a collision.
pub fn generate_wallet_number() -> String {
    let mut rng = rand::thread_rng();
    (0..WALLET_NUMBER_LENGTH).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}

pub fn is_valid_wallet_number(number: &str) -> bool {
    number.len() == WALLET_NUMBER_LENGTH && number.bytes().all(|b| b.is_ascii_digit())
}
