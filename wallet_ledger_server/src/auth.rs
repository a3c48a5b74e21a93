//! Caller identity.
//!
//! Sessions and API keys are resolved by the identity layer in front of this server, which forwards the result as
//! request headers:
//! * `X-Wallet-Owner`: the owner id. Required.
//! * `X-Wallet-Email`: the owner's email address. Used as the payer address for deposits.
//! * `X-Wallet-Permissions`: a comma-separated permission list for service principals (API keys). When the header is
//!   absent, the caller is a user session and carries every permission.
//!
//! If [`IdentityConfig::proxy_secret`] is configured, the headers are only believed when `X-Identity-Secret` carries
//! the same value.
use std::{future::Future, ops::Deref, pin::Pin};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use log::*;
use wallet_ledger_engine::Principal;

use crate::{config::IdentityConfig, errors::ServerError};

pub const OWNER_HEADER: &str = "X-Wallet-Owner";
pub const EMAIL_HEADER: &str = "X-Wallet-Email";
pub const PERMISSIONS_HEADER: &str = "X-Wallet-Permissions";
pub const IDENTITY_SECRET_HEADER: &str = "X-Identity-Secret";

/// The resolved caller of a request. Handlers take this as an extractor argument.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl Deref for AuthenticatedPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedPrincipal {
    type Error = ServerError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = principal_from_headers(req).map(AuthenticatedPrincipal);
        Box::pin(async move { result })
    }
}

fn header_value<'r>(req: &'r HttpRequest, name: &str) -> Result<Option<&'r str>, ServerError> {
    match req.headers().get(name) {
        None => Ok(None),
        Some(v) => {
            v.to_str().map(|s| Some(s.trim())).map_err(|e| ServerError::AuthenticationError(format!("{name}: {e}")))
        },
    }
}

pub fn principal_from_headers(req: &HttpRequest) -> Result<Principal, ServerError> {
    let proxy_secret = req.app_data::<web::Data<IdentityConfig>>().and_then(|c| c.proxy_secret.clone());
    if let Some(secret) = proxy_secret {
        let presented = header_value(req, IDENTITY_SECRET_HEADER)?.unwrap_or_default();
        if presented != secret.reveal().as_str() {
            warn!("🔐️ Request carried identity headers without a valid identity-layer secret. Denying access.");
            return Err(ServerError::AuthenticationError("Identity headers are not trusted".into()));
        }
    }
    let owner_id = match header_value(req, OWNER_HEADER)? {
        Some(owner) if !owner.is_empty() => owner.to_string(),
        _ => {
            debug!("🔐️ No {OWNER_HEADER} header in request");
            return Err(ServerError::AuthenticationError("user not found".into()));
        },
    };
    let email = header_value(req, EMAIL_HEADER)?.unwrap_or_default().to_string();
    let principal = match header_value(req, PERMISSIONS_HEADER)? {
        None => Principal::user(owner_id, email),
        Some(list) => {
            let permissions = Principal::parse_permissions(list)
                .map_err(|e| ServerError::AuthenticationError(format!("{PERMISSIONS_HEADER}: {e}")))?;
            Principal::service(owner_id, email, &permissions)
        },
    };
    trace!("🔐️ Request principal: {principal:?}");
    Ok(principal)
}
