//! # Wallet ledger server
//! The HTTP face of the wallet ledger. It is responsible for:
//! * Turning identity headers from the upstream identity layer into a [`wallet_ledger_engine::Principal`].
//! * Exposing the ledger engine's deposit, transfer and query operations as JSON endpoints.
//! * Receiving Paystack webhooks, checking their signatures, and feeding the outcomes to the deposit reconciler.
//! * Periodically failing deposits that Paystack never reported on.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /wallet`: Opens the caller's wallet (idempotent).
//! * `POST /wallet/deposit`: Starts a deposit and returns the Paystack checkout link.
//! * `GET /wallet/deposit/{reference}/status`: The status of one of the caller's deposits.
//! * `GET /wallet/balance`: The caller's balance and wallet number.
//! * `POST /wallet/transfer`: Sends funds to another wallet.
//! * `GET /wallet/transactions`: The caller's ledger entries, newest first.
//! * `POST /wallet/paystack/webhook`: Paystack transaction notifications.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
