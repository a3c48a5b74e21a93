use ledger_common::MinorUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the payment provider hands back when a deposit is initialized. The payer completes the payment by visiting
/// `authorization_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationHandle {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// The narrow interface to the external payment provider.
///
/// The provider later reports the outcome of every initialized payment through an asynchronous, at-least-once,
/// possibly out-of-order notification. Those notifications are fed into
/// [`crate::DepositFlowApi::apply_outcome`].
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    async fn initialize(
        &self,
        amount: MinorUnits,
        payer_email: &str,
        reference: &str,
    ) -> Result<AuthorizationHandle, GatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment provider rejected the request: {0}")]
    Rejected(String),
    #[error("The payment provider could not be reached: {0}")]
    Unavailable(String),
    #[error("The payment provider sent a response we could not understand: {0}")]
    InvalidResponse(String),
}
