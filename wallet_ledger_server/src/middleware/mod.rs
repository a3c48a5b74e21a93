mod hmac;

pub use hmac::{SignatureCheckFactory, SignatureCheckService};
