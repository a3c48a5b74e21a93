use cucumber::World;
use log::*;
use wallet_ledger_engine::{
    db_types::Wallet,
    events::EventProducers,
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations, TEST_LOCK_TIMEOUT},
        MockGateway,
    },
    DepositFlowApi,
    LedgerDatabase,
    LedgerError,
    Principal,
    SqliteDatabase,
    TransferApi,
    WalletApi,
};

#[derive(Default, Debug, World)]
pub struct LedgerWorld {
    pub system: Option<LedgerSystem>,
    pub last_error: Option<LedgerError>,
    pub last_deposit: Option<String>,
}

#[derive(Debug)]
pub struct LedgerSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub gateway: MockGateway,
    pub wallets: WalletApi<SqliteDatabase>,
    pub transfers: TransferApi<SqliteDatabase>,
    pub deposits: DepositFlowApi<SqliteDatabase, MockGateway>,
}

impl LedgerWorld {
    pub fn system(&self) -> &LedgerSystem {
        self.system.as_ref().expect("Ledger not initialised")
    }

    pub fn record<T>(&mut self, result: Result<T, LedgerError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                debug!("🥒️ Operation failed: {e}");
                self.last_error = Some(e);
                None
            },
        }
    }

    pub async fn wallet_of(&self, owner: &str) -> Wallet {
        self.system()
            .db
            .fetch_wallet_for_owner(owner)
            .await
            .expect("Error fetching wallet")
            .unwrap_or_else(|| panic!("{owner} has no wallet"))
    }
}

impl LedgerSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5, TEST_LOCK_TIMEOUT)
            .await
            .expect("Error creating connection to database");
        debug!("Created database: {url}");
        let gateway = MockGateway::new();
        let wallets = WalletApi::new(db.clone());
        let transfers = TransferApi::new(db.clone(), EventProducers::default());
        let deposits = DepositFlowApi::new(db.clone(), gateway.clone(), EventProducers::default());
        Self { db_path: url, db, gateway, wallets, transfers, deposits }
    }
}

pub fn user(owner: &str) -> Principal {
    Principal::user(owner.to_string(), format!("{owner}@example.com"))
}

pub fn error_kind(e: &LedgerError) -> &'static str {
    match e {
        LedgerError::ValidationError(_) => "ValidationError",
        LedgerError::WalletNotFound(_) => "WalletNotFound",
        LedgerError::RecipientNotFound(_) => "RecipientNotFound",
        LedgerError::UnknownReference(_) => "UnknownReference",
        LedgerError::WrongEntryKind { .. } => "WrongEntryKind",
        LedgerError::InsufficientBalance { .. } => "InsufficientBalance",
        LedgerError::PermissionDenied(_) => "PermissionDenied",
        LedgerError::LockTimeout(_) => "LockTimeout",
        LedgerError::StorageError(_) => "StorageError",
        LedgerError::GatewayError(_) => "GatewayError",
        LedgerError::DuplicateReference(_) => "DuplicateReference",
    }
}
