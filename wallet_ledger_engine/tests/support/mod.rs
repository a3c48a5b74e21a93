#![allow(dead_code)]
use ledger_common::MinorUnits;
use wallet_ledger_engine::{
    db_types::{Wallet, WalletRef},
    events::EventProducers,
    test_utils::{prepare_env::fresh_database, MockGateway},
    BalanceStore,
    DepositFlowApi,
    LedgerDatabase,
    Principal,
    SqliteDatabase,
    TransferApi,
    UnitOfWork,
    WalletApi,
};

pub struct Ledger {
    pub db: SqliteDatabase,
    pub gateway: MockGateway,
    pub wallets: WalletApi<SqliteDatabase>,
    pub transfers: TransferApi<SqliteDatabase>,
    pub deposits: DepositFlowApi<SqliteDatabase, MockGateway>,
}

impl Ledger {
    pub async fn new() -> Self {
        Self::with_producers(EventProducers::default()).await
    }

    pub async fn with_producers(producers: EventProducers) -> Self {
        let db = fresh_database().await;
        let gateway = MockGateway::new();
        let wallets = WalletApi::new(db.clone());
        let transfers = TransferApi::new(db.clone(), producers.clone());
        let deposits = DepositFlowApi::new(db.clone(), gateway.clone(), producers);
        Self { db, gateway, wallets, transfers, deposits }
    }

    /// Opens a wallet for `owner` and forces its balance to `balance`.
    pub async fn wallet_with_balance(&self, owner: &str, balance: i64) -> Wallet {
        let wallet = self.wallets.open_wallet(owner).await.expect("Error opening wallet");
        let mut uow = self.db.begin().await.expect("Error starting unit of work");
        let mut wallet = uow.lock_and_load(&WalletRef::Id(wallet.id)).await.expect("Error locking wallet");
        wallet.balance = MinorUnits::from(balance);
        uow.save(&wallet).await.expect("Error saving wallet");
        uow.commit().await.expect("Error committing");
        wallet
    }

    pub async fn balance_of(&self, owner: &str) -> MinorUnits {
        self.wallets.balance(&user(owner)).await.expect("Error fetching balance")
    }

    pub async fn tear_down(self) {
        wallet_ledger_engine::test_utils::prepare_env::tear_down(self.db).await;
    }
}

pub fn user(owner: &str) -> Principal {
    Principal::user(owner.to_string(), format!("{owner}@example.com"))
}
