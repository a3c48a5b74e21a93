use cucumber::given;
use ledger_common::MinorUnits;
use wallet_ledger_engine::{
    db_types::{NewLedgerEntry, WalletRef},
    BalanceStore,
    EntryLog,
    LedgerDatabase,
    UnitOfWork,
};

use crate::cucumber::{LedgerSystem, LedgerWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut LedgerWorld) {
    let system = LedgerSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a wallet for '{word}' with a balance of {int}")]
async fn funded_wallet(world: &mut LedgerWorld, owner: String, balance: i64) {
    let sys = world.system();
    let wallet = sys.wallets.open_wallet(&owner).await.expect("Error opening wallet");
    let mut uow = sys.db.begin().await.expect("Error starting unit of work");
    let mut wallet = uow.lock_and_load(&WalletRef::Id(wallet.id)).await.expect("Error locking wallet");
    wallet.balance = MinorUnits::from(balance);
    uow.save(&wallet).await.expect("Error saving wallet");
    uow.commit().await.expect("Error committing");
}

#[given(expr = "a pending deposit {word} of {int} for '{word}'")]
async fn pending_deposit(world: &mut LedgerWorld, reference: String, amount: i64, owner: String) {
    let wallet = world.wallet_of(&owner).await;
    let mut uow = world.system().db.begin().await.expect("Error starting unit of work");
    let entry = NewLedgerEntry::pending_deposit(reference.clone(), wallet.id, MinorUnits::from(amount));
    uow.append(entry).await.expect("Error appending deposit");
    uow.commit().await.expect("Error committing");
    world.last_deposit = Some(reference);
}
