use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    ResponseError,
};
use ledger_common::{MinorUnits, Secret};
use paystack_tools::{calculate_signature, SIGNATURE_HEADER};
use serde_json::Value;
use wallet_ledger_engine::{
    db_types::{Wallet, WalletRef},
    events::EventProducers,
    test_utils::{prepare_env::fresh_database, MockGateway},
    BalanceStore,
    DepositFlowApi,
    LedgerDatabase,
    SqliteDatabase,
    TransferApi,
    UnitOfWork,
    WalletApi,
};

use crate::{
    auth::{EMAIL_HEADER, OWNER_HEADER, PERMISSIONS_HEADER},
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

pub const WEBHOOK_SECRET: &str = "sk_test_endpoint_tests";

pub struct TestSystem {
    pub db: SqliteDatabase,
    pub gateway: MockGateway,
}

impl TestSystem {
    pub async fn new() -> Self {
        let _ = env_logger::try_init();
        Self { db: fresh_database().await, gateway: MockGateway::new() }
    }

    /// Registers every wallet route against this system's database and mock gateway.
    pub fn configure(&self) -> impl FnOnce(&mut ServiceConfig) {
        let db = self.db.clone();
        let gateway = self.gateway.clone();
        move |cfg: &mut ServiceConfig| {
            let producers = EventProducers::default();
            let paystack_scope = web::scope("/wallet/paystack")
                .wrap(SignatureCheckFactory::new(SIGNATURE_HEADER, Secret::new(WEBHOOK_SECRET.to_string()), true))
                .service(PaystackWebhookRoute::<SqliteDatabase, MockGateway>::new());
            cfg.app_data(web::Data::new(WalletApi::new(db.clone())))
                .app_data(web::Data::new(TransferApi::new(db.clone(), producers.clone())))
                .app_data(web::Data::new(DepositFlowApi::new(db, gateway, producers)))
                .service(health)
                .service(paystack_scope)
                .service(OpenWalletRoute::<SqliteDatabase>::new())
                .service(BalanceRoute::<SqliteDatabase>::new())
                .service(TransactionsRoute::<SqliteDatabase>::new())
                .service(DepositRoute::<SqliteDatabase, MockGateway>::new())
                .service(DepositStatusRoute::<SqliteDatabase>::new())
                .service(TransferRoute::<SqliteDatabase>::new());
        }
    }

    /// Opens a wallet for `owner` and forces its balance, bypassing deposits.
    pub async fn wallet_with_balance(&self, owner: &str, balance: i64) -> Wallet {
        let wallet = WalletApi::new(self.db.clone()).open_wallet(owner).await.expect("Could not open wallet");
        let mut uow = self.db.begin().await.expect("Could not begin unit of work");
        let mut wallet = uow.lock_and_load(&WalletRef::Id(wallet.id)).await.expect("Could not lock wallet");
        wallet.balance = MinorUnits::from(balance);
        uow.save(&wallet).await.expect("Could not save wallet");
        uow.commit().await.expect("Could not commit");
        wallet
    }

    pub async fn tear_down(self) {
        wallet_ledger_engine::test_utils::prepare_env::tear_down(self.db).await;
    }
}

/// A request made by `owner`'s user session.
pub fn as_user(req: TestRequest, owner: &str) -> TestRequest {
    req.insert_header((OWNER_HEADER, owner)).insert_header((EMAIL_HEADER, format!("{owner}@example.com")))
}

/// A request made with a scoped API key belonging to `owner`.
pub fn as_service(req: TestRequest, owner: &str, permissions: &str) -> TestRequest {
    as_user(req, owner).insert_header((PERMISSIONS_HEADER, permissions))
}

/// A webhook delivery, signed with `secret`.
pub fn signed_webhook(body: &str, secret: &str) -> TestRequest {
    let signature = calculate_signature(secret, body.as_bytes());
    TestRequest::post()
        .uri("/wallet/paystack/webhook")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((SIGNATURE_HEADER, signature))
        .set_payload(body.to_string())
}

pub fn charge_event(event: &str, reference: &str, status: &str) -> String {
    serde_json::json!({
        "event": event,
        "data": { "reference": reference, "status": status, "amount": 10_000, "currency": "NGN" }
    })
    .to_string()
}

/// Sends a request and returns the status and body. Errors raised by middleware are rendered the same way the
/// server would render them.
pub async fn send<S, B>(app: &S, req: TestRequest) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.as_response_error().error_response();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub async fn send_json<S, B>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(app, req).await;
    let json = serde_json::from_str(&body).unwrap_or_else(|e| panic!("Response was not JSON ({e}): {body}"));
    (status, json)
}
