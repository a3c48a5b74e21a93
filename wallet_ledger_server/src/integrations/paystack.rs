//! The Paystack side of deposits: a [`PaymentGateway`] backed by the Paystack REST API.
use ledger_common::MinorUnits;
use log::*;
use paystack_tools::{PaystackApi, PaystackApiError, PaystackConfig};
use wallet_ledger_engine::{AuthorizationHandle, GatewayError, PaymentGateway};

#[derive(Clone)]
pub struct PaystackGateway {
    api: PaystackApi,
}

impl PaystackGateway {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let api = PaystackApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for PaystackGateway {
    async fn initialize(
        &self,
        amount: MinorUnits,
        payer_email: &str,
        reference: &str,
    ) -> Result<AuthorizationHandle, GatewayError> {
        let auth = self.api.initialize_transaction(amount.value(), payer_email, reference).await.map_err(gateway_error)?;
        if auth.reference != reference {
            warn!(
                "💳️ Paystack returned reference {} for deposit {reference}. Webhooks will carry our reference, so this \
                 is harmless, but unexpected.",
                auth.reference
            );
        }
        Ok(AuthorizationHandle {
            authorization_url: auth.authorization_url,
            access_code: auth.access_code,
            reference: reference.to_string(),
        })
    }
}

/// Client errors (4xx, or `status: false`) mean Paystack refused the request. Everything on the transport or 5xx
/// side means it could not be reached.
pub fn gateway_error(e: PaystackApiError) -> GatewayError {
    match e {
        PaystackApiError::Declined(msg) => GatewayError::Rejected(msg),
        PaystackApiError::QueryError { status, message } if (400..500).contains(&status) => {
            GatewayError::Rejected(format!("{status}: {message}"))
        },
        PaystackApiError::QueryError { status, message } => GatewayError::Unavailable(format!("{status}: {message}")),
        PaystackApiError::Initialization(s) | PaystackApiError::RestRequestError(s) => GatewayError::Unavailable(s),
        PaystackApiError::RestResponseError(s) | PaystackApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        PaystackApiError::EmptyResponse => GatewayError::InvalidResponse("empty response".into()),
    }
}
