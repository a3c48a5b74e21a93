use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use paystack_tools::SIGNATURE_HEADER;
use wallet_ledger_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    DepositFlowApi,
    SqliteDatabase,
    TransferApi,
    WalletApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    expiry_worker::start_expiry_worker,
    integrations::paystack::PaystackGateway,
    middleware::SignatureCheckFactory,
    routes::{
        health,
        BalanceRoute,
        DepositRoute,
        DepositStatusRoute,
        OpenWalletRoute,
        PaystackWebhookRoute,
        TransactionsRoute,
        TransferRoute,
    },
};

pub const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections, config.lock_timeout)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = PaystackGateway::new(config.paystack.api.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, logging_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let expiry_api = DepositFlowApi::new(db.clone(), gateway.clone(), producers.clone());
    let _worker = start_expiry_worker(expiry_api, config.pending_deposit_timeout, config.expiry_check_interval);
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: PaystackGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let wallet_api = WalletApi::new(db.clone());
        let transfer_api = TransferApi::new(db.clone(), producers.clone());
        let deposit_api = DepositFlowApi::new(db.clone(), gateway.clone(), producers.clone());
        let webhook_secret = config.paystack.webhook_secret.clone();
        let paystack_scope = web::scope("/wallet/paystack")
            .wrap(SignatureCheckFactory::new(SIGNATURE_HEADER, webhook_secret, config.paystack.signature_checks))
            .service(PaystackWebhookRoute::<SqliteDatabase, PaystackGateway>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wls::access_log"))
            .app_data(web::Data::new(config.identity.clone()))
            .app_data(web::Data::new(wallet_api))
            .app_data(web::Data::new(transfer_api))
            .app_data(web::Data::new(deposit_api))
            .service(health)
            .service(paystack_scope)
            .service(OpenWalletRoute::<SqliteDatabase>::new())
            .service(BalanceRoute::<SqliteDatabase>::new())
            .service(TransactionsRoute::<SqliteDatabase>::new())
            .service(DepositRoute::<SqliteDatabase, PaystackGateway>::new())
            .service(DepositStatusRoute::<SqliteDatabase>::new())
            .service(TransferRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Settled deposits and completed transfers are written to the log. Nothing else listens for ledger events yet.
pub fn logging_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_deposit_settled(|ev| {
        Box::pin(async move {
            match ev.new_balance {
                Some(balance) => info!(
                    "📬️ Deposit {} of {} settled into wallet {}. New balance: {balance}",
                    ev.entry.reference, ev.entry.amount, ev.entry.wallet_id
                ),
                None => info!("📬️ Deposit {} of {} failed", ev.entry.reference, ev.entry.amount),
            }
        })
    });
    hooks.on_transfer_completed(|ev| {
        Box::pin(async move {
            info!(
                "📬️ Transfer of {} from wallet {} to wallet {} completed ({} / {})",
                ev.amount(),
                ev.debit.wallet_id,
                ev.credit.wallet_id,
                ev.debit.reference,
                ev.credit.reference
            );
        })
    });
    hooks
}
