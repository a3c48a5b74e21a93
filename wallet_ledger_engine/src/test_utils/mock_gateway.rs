use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
    Mutex,
};

use ledger_common::MinorUnits;
use log::*;

use crate::traits::{AuthorizationHandle, GatewayError, PaymentGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub amount: MinorUnits,
    pub payer_email: String,
    pub reference: String,
}

/// A payment gateway that records every call and answers with a canned checkout link. It can be switched into a
/// failing mode to simulate a provider outage.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    failing: Arc<AtomicBool>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PaymentGateway for MockGateway {
    async fn initialize(
        &self,
        amount: MinorUnits,
        payer_email: &str,
        reference: &str,
    ) -> Result<AuthorizationHandle, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(GatewayCall { amount, payer_email: payer_email.to_string(), reference: reference.to_string() });
        }
        if self.failing.load(Ordering::SeqCst) {
            debug!("🧪️ Mock gateway refusing to initialize {reference}");
            return Err(GatewayError::Unavailable("mock gateway is offline".to_string()));
        }
        Ok(AuthorizationHandle {
            authorization_url: format!("https://checkout.example.com/{reference}"),
            access_code: format!("access_{reference}"),
            reference: reference.to_string(),
        })
    }
}
