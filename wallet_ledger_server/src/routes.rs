//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every ledger operation is async, and handlers must keep it that way.
//!
//! Handlers never retry. A `503` (lock timeout) is safe for the client to retry, since the aborted unit of work left no
//! trace.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use paystack_tools::WebhookEvent;
use serde_json::json;
use wallet_ledger_engine::{
    db_types::DepositOutcome,
    DepositFlowApi,
    LedgerDatabase,
    PaymentGateway,
    TransferApi,
    WalletApi,
};

use crate::{
    auth::AuthenticatedPrincipal,
    data_objects::{
        BalanceResponse,
        DepositRequest,
        DepositResponse,
        DepositStatusResponse,
        TransactionItem,
        TransferRequest,
        TransferResponse,
        WalletResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Wallet  ----------------------------------------------------
route!(open_wallet => Post "/wallet" impl LedgerDatabase);
/// Opens the caller's wallet. Calling this again returns the existing wallet.
pub async fn open_wallet<B: LedgerDatabase>(
    principal: AuthenticatedPrincipal,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST wallet for {}", principal.owner_id);
    let wallet = api.open_wallet(&principal.owner_id).await?;
    Ok(HttpResponse::Ok().json(WalletResponse::from(wallet)))
}

route!(balance => Get "/wallet/balance" impl LedgerDatabase);
pub async fn balance<B: LedgerDatabase>(
    principal: AuthenticatedPrincipal,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET balance for {}", principal.owner_id);
    let wallet = api.wallet(&principal).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse { balance: wallet.balance, wallet_number: wallet.number }))
}

route!(transactions => Get "/wallet/transactions" impl LedgerDatabase);
/// The caller's ledger entries, newest first.
pub async fn transactions<B: LedgerDatabase>(
    principal: AuthenticatedPrincipal,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET transactions for {}", principal.owner_id);
    let entries = api.list_transactions(&principal).await?;
    let items = entries.into_iter().map(TransactionItem::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(items))
}

//----------------------------------------------   Deposits  ----------------------------------------------------
route!(deposit => Post "/wallet/deposit" impl LedgerDatabase, PaymentGateway);
/// Starts a deposit. The response carries the checkout link the payer must visit to complete the payment. The wallet
/// is only credited once Paystack reports success through the webhook.
pub async fn deposit<B: LedgerDatabase, G: PaymentGateway>(
    principal: AuthenticatedPrincipal,
    body: web::Json<DepositRequest>,
    api: web::Data<DepositFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let DepositRequest { amount } = body.into_inner();
    debug!("💻️ POST deposit of {amount} for {}", principal.owner_id);
    let initiated = api.initiate_deposit(&principal, amount).await?;
    Ok(HttpResponse::Ok().json(DepositResponse::from(initiated)))
}

route!(deposit_status => Get "/wallet/deposit/{reference}/status" impl LedgerDatabase);
/// Reports a deposit's status. This never credits anything; only the webhook does.
pub async fn deposit_status<B: LedgerDatabase>(
    principal: AuthenticatedPrincipal,
    path: web::Path<String>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    debug!("💻️ GET deposit status for {reference}");
    let entry = api.deposit_status(&principal, &reference).await?;
    Ok(HttpResponse::Ok().json(DepositStatusResponse::from(entry)))
}

//----------------------------------------------   Transfers  ----------------------------------------------------
route!(transfer => Post "/wallet/transfer" impl LedgerDatabase);
pub async fn transfer<B: LedgerDatabase>(
    principal: AuthenticatedPrincipal,
    body: web::Json<TransferRequest>,
    api: web::Data<TransferApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let TransferRequest { wallet_number, amount } = body.into_inner();
    debug!("💻️ POST transfer of {amount} from {} to {wallet_number}", principal.owner_id);
    let receipt = api.transfer(&principal, wallet_number.trim(), amount).await?;
    Ok(HttpResponse::Ok().json(TransferResponse::from(receipt)))
}

//----------------------------------------------   Paystack  ----------------------------------------------------
route!(paystack_webhook => Post "/webhook" impl LedgerDatabase, PaymentGateway);
/// Paystack transaction notifications. The signature has already been checked by
/// [`crate::middleware::SignatureCheckFactory`] by the time this runs.
///
/// Deliveries are at-least-once and may arrive out of order; [`DepositFlowApi::apply_outcome`] makes every repeat a
/// no-op, so repeats are acknowledged with the same `200` response as the first delivery.
pub async fn paystack_webhook<B: LedgerDatabase, G: PaymentGateway>(
    body: web::Bytes,
    api: web::Data<DepositFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let event = serde_json::from_slice::<WebhookEvent>(body.as_ref()).map_err(|e| {
        debug!("💻️ Could not deserialize Paystack webhook. {e}");
        ServerError::InvalidWebhook("invalid payload".into())
    })?;
    if event.data.reference.trim().is_empty() {
        return Err(ServerError::InvalidWebhook("missing reference".into()));
    }
    if !event.event.starts_with("charge.") {
        info!("💻️ Ignoring Paystack '{}' event for {}", event.event, event.data.reference);
        return Ok(HttpResponse::Ok().json(json!({ "status": true })));
    }
    let raw_payload = String::from_utf8_lossy(body.as_ref()).into_owned();
    let outcome = DepositOutcome::from(event.outcome());
    let result = api.apply_outcome(event.data.reference.trim(), outcome, Some(raw_payload)).await?;
    info!("💻️ Paystack '{}' webhook processed. {result}", event.event);
    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}
