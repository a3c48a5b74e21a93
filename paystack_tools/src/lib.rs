//! Paystack integration tools.
//!
//! * [`PaystackApi`] is a small REST client for the parts of the Paystack API the wallet service uses.
//! * [`WebhookEvent`] models the notifications Paystack posts to the webhook endpoint.
//! * [`verify_signature`] checks the `x-paystack-signature` header on those notifications.
mod api;
mod config;
mod data_objects;
mod error;
mod signature;

pub use api::PaystackApi;
pub use config::PaystackConfig;
pub use data_objects::{InitializeTransaction, PaystackResponse, TransactionAuthorization, WebhookData, WebhookEvent};
pub use error::PaystackApiError;
pub use signature::{calculate_signature, verify_signature, SIGNATURE_HEADER};
