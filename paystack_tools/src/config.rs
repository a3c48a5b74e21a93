use std::time::Duration;

use ledger_common::Secret;
use log::*;

pub const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";
pub const DEFAULT_PAYSTACK_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub base_url: String,
    /// Used both as the bearer token for API calls and as the HMAC key for webhook signatures
    pub secret_key: Secret<String>,
    /// Upper bound on a whole API call, from connecting to reading the last byte of the response
    pub timeout: Duration,
}

impl Default for PaystackConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAYSTACK_BASE_URL, Secret::default())
    }
}

impl PaystackConfig {
    pub fn new(base_url: &str, secret_key: Secret<String>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), secret_key, timeout: DEFAULT_PAYSTACK_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("WLS_PAYSTACK_BASE_URL").unwrap_or_else(|_| {
            info!("WLS_PAYSTACK_BASE_URL not set, using {DEFAULT_PAYSTACK_BASE_URL}");
            DEFAULT_PAYSTACK_BASE_URL.to_string()
        });
        let secret_key = Secret::new(std::env::var("WLS_PAYSTACK_SECRET_KEY").unwrap_or_else(|_| {
            warn!("WLS_PAYSTACK_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let timeout = parse_timeout(std::env::var("WLS_PAYSTACK_TIMEOUT").ok());
        Self::new(&base_url, secret_key).with_timeout(timeout)
    }
}

/// Reads a timeout in whole seconds. Missing, unparseable and zero values fall back to [`DEFAULT_PAYSTACK_TIMEOUT`].
fn parse_timeout(value: Option<String>) -> Duration {
    let Some(value) = value else {
        return DEFAULT_PAYSTACK_TIMEOUT;
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warn!(
                "Invalid WLS_PAYSTACK_TIMEOUT value '{value}'. Using the default of {}s",
                DEFAULT_PAYSTACK_TIMEOUT.as_secs()
            );
            DEFAULT_PAYSTACK_TIMEOUT
        },
    }
}
