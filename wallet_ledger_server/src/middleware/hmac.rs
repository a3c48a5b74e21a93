//! Webhook signature middleware for Actix Web.
//!
//! Paystack signs every webhook with HMAC-SHA512 over the raw request body, keyed with the account's secret key, and
//! sends the hex digest in the `x-paystack-signature` header.
//!
//! Wrap the webhook scope with [`SignatureCheckFactory`] so that handlers only ever see authentic notifications. The
//! body is buffered to check the signature and then put back on the request, so handlers can still extract it.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web::Bytes,
    Error,
};
use futures::future::LocalBoxFuture;
use ledger_common::Secret;
use log::{trace, warn};
use paystack_tools::verify_signature;

use crate::errors::ServerError;

#[derive(Clone)]
struct SignaturePolicy {
    header: String,
    secret: Secret<String>,
    /// When false, every request passes unchecked
    enforce: bool,
}

impl SignaturePolicy {
    /// Buffers the body and checks it against the signature header. On success the body is restored.
    async fn check(&self, req: &mut ServiceRequest) -> Result<(), ServerError> {
        let body = req.extract::<Bytes>().await.map_err(|e| {
            warn!("🔐️ Could not read webhook body. {e}");
            ServerError::InvalidRequestBody("cannot read body".into())
        })?;
        // A missing header counts as an empty, and therefore invalid, signature
        let signature = req.headers().get(&self.header).and_then(|v| v.to_str().ok()).unwrap_or_default();
        if !verify_signature(self.secret.reveal(), body.as_ref(), signature) {
            warn!("🔐️ Webhook with an invalid or missing {} header. Denying access.", self.header);
            return Err(ServerError::InvalidSignature);
        }
        let (_, mut restored) = h1::Payload::create(true);
        restored.unread_data(body);
        req.set_payload(Payload::from(restored));
        Ok(())
    }
}

pub struct SignatureCheckFactory {
    policy: SignaturePolicy,
}

impl SignatureCheckFactory {
    pub fn new(header: &str, secret: Secret<String>, enforce: bool) -> Self {
        Self { policy: SignaturePolicy { header: header.to_string(), secret, enforce } }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureCheckFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureCheckService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureCheckService { policy: Rc::new(self.policy.clone()), inner: Rc::new(service) }))
    }
}

pub struct SignatureCheckService<S> {
    policy: Rc<SignaturePolicy>,
    inner: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureCheckService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(inner);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let inner = Rc::clone(&self.inner);
        let policy = Rc::clone(&self.policy);
        Box::pin(async move {
            if policy.enforce {
                policy.check(&mut req).await?;
                trace!("🔐️ Webhook signature ✅️");
            } else {
                trace!("🔐️ Signature checks are disabled. Allowing webhook.");
            }
            inner.call(req).await
        })
    }
}
