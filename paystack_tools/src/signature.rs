use hmac::{Hmac, Mac};
use sha2::Sha512;

/// The header Paystack uses to sign webhook notifications.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

type HmacSha512 = Hmac<Sha512>;

/// The lowercase hex HMAC-SHA512 of `body`, keyed with `secret`.
pub fn calculate_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC can take a key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a webhook signature in constant time. Empty or malformed signatures never verify.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let signature_hex = signature_hex.trim();
    if signature_hex.is_empty() {
        return false;
    }
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}
