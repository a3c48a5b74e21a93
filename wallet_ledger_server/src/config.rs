use std::{env, time::Duration as StdDuration};

use chrono::Duration;
use ledger_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use paystack_tools::PaystackConfig;
use wallet_ledger_engine::sqlite_db::db_url;

const DEFAULT_WLS_HOST: &str = "127.0.0.1";
const DEFAULT_WLS_PORT: u16 = 8480;
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_LOCK_TIMEOUT: StdDuration = StdDuration::from_millis(5_000);
const DEFAULT_PENDING_DEPOSIT_TIMEOUT: Duration = Duration::hours(24);
const DEFAULT_EXPIRY_CHECK_INTERVAL: StdDuration = StdDuration::from_secs(300);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// How long a unit of work waits for a wallet or entry lock before giving up with a `LockTimeout`.
    pub lock_timeout: StdDuration,
    /// Deposits that are still pending after this long are failed by the expiry worker.
    pub pending_deposit_timeout: Duration,
    pub expiry_check_interval: StdDuration,
    pub identity: IdentityConfig,
    pub paystack: PaystackServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WLS_HOST.to_string(),
            port: DEFAULT_WLS_PORT,
            database_url: String::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            pending_deposit_timeout: DEFAULT_PENDING_DEPOSIT_TIMEOUT,
            expiry_check_interval: DEFAULT_EXPIRY_CHECK_INTERVAL,
            identity: IdentityConfig::default(),
            paystack: PaystackServerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WLS_HOST").ok().unwrap_or_else(|| DEFAULT_WLS_HOST.into());
        let port = env::var("WLS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WLS_PORT. {e} Using the default, {DEFAULT_WLS_PORT}, instead."
                    );
                    DEFAULT_WLS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WLS_PORT);
        let database_url = db_url();
        let max_connections = parse_env("WLS_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let lock_timeout = StdDuration::from_millis(parse_env(
            "WLS_LOCK_TIMEOUT_MS",
            DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
        ));
        let pending_deposit_timeout =
            Duration::hours(parse_env("WLS_PENDING_DEPOSIT_TIMEOUT", DEFAULT_PENDING_DEPOSIT_TIMEOUT.num_hours()));
        let expiry_check_interval = StdDuration::from_secs(parse_env(
            "WLS_EXPIRY_CHECK_INTERVAL",
            DEFAULT_EXPIRY_CHECK_INTERVAL.as_secs(),
        ));
        let identity = IdentityConfig::from_env();
        let paystack = PaystackServerConfig::from_env_or_defaults();
        Self {
            host,
            port,
            database_url,
            max_connections,
            lock_timeout,
            pending_deposit_timeout,
            expiry_check_interval,
            identity,
            paystack,
        }
    }
}

/// Reads and parses a numeric environment variable. Missing or invalid values fall back to `default`.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ Invalid configuration value for {name} ({s}). {e}. Using the default value of {default}.");
            default
        }),
        Err(_) => {
            info!("🪛️ {name} is not set. Using the default value of {default}.");
            default
        },
    }
}

//-------------------------------------------------  IdentityConfig  ---------------------------------------------------
/// How far the identity headers set by the upstream identity layer are trusted.
#[derive(Clone, Debug, Default)]
pub struct IdentityConfig {
    /// When set, requests must carry this value in `X-Identity-Secret` before their identity headers are believed.
    pub proxy_secret: Option<Secret<String>>,
}

impl IdentityConfig {
    pub fn new(proxy_secret: Option<Secret<String>>) -> Self {
        Self { proxy_secret }
    }

    pub fn from_env() -> Self {
        let proxy_secret = env::var("WLS_IDENTITY_PROXY_SECRET").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if proxy_secret.is_none() {
            warn!(
                "🚨️ WLS_IDENTITY_PROXY_SECRET is not set. Identity headers will be trusted from ANY caller. Only run \
                 like this if the server is unreachable except through the identity layer."
            );
        }
        Self { proxy_secret }
    }
}

//-------------------------------------------------  PaystackServerConfig  ---------------------------------------------
#[derive(Clone, Debug)]
pub struct PaystackServerConfig {
    pub api: PaystackConfig,
    /// The key webhook signatures are checked against. Paystack signs with the account's secret key, so this is the
    /// same as `api.secret_key` unless explicitly overridden.
    pub webhook_secret: Secret<String>,
    /// If false, webhooks are accepted without a valid signature. **DANGER**
    pub signature_checks: bool,
}

impl Default for PaystackServerConfig {
    fn default() -> Self {
        Self { api: PaystackConfig::default(), webhook_secret: Secret::default(), signature_checks: true }
    }
}

impl PaystackServerConfig {
    pub fn from_env_or_defaults() -> Self {
        let api = PaystackConfig::new_from_env_or_default();
        let webhook_secret = env::var("WLS_PAYSTACK_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(Secret::new)
            .unwrap_or_else(|| api.secret_key.clone());
        let signature_checks = parse_boolean_flag(env::var("WLS_WEBHOOK_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!("🚨️ Webhook signature checks are DISABLED. Anyone can settle deposits. 🚨️");
        }
        Self { api, webhook_secret, signature_checks }
    }
}
