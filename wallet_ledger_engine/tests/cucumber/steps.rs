use cucumber::{then, when};
use ledger_common::MinorUnits;
use wallet_ledger_engine::{
    db_types::{DepositOutcome, Direction, EntryStatus},
    LedgerDatabase,
};

use crate::cucumber::{
    ledger_world::{error_kind, user},
    LedgerWorld,
};

#[when(expr = "'{word}' transfers {int} to '{word}'")]
async fn transfer_to_owner(world: &mut LedgerWorld, from: String, amount: i64, to: String) {
    let destination = world.wallet_of(&to).await;
    let result = world.system().transfers.transfer(&user(&from), &destination.number, MinorUnits::from(amount)).await;
    world.record(result);
}

#[when(expr = "'{word}' transfers {int} to wallet number {word}")]
async fn transfer_to_number(world: &mut LedgerWorld, from: String, amount: i64, number: String) {
    let result = world.system().transfers.transfer(&user(&from), &number, MinorUnits::from(amount)).await;
    world.record(result);
}

#[when(expr = "'{word}' starts a deposit of {int}")]
async fn start_deposit(world: &mut LedgerWorld, owner: String, amount: i64) {
    let result = world.system().deposits.initiate_deposit(&user(&owner), MinorUnits::from(amount)).await;
    if let Some(initiated) = world.record(result) {
        world.last_deposit = Some(initiated.reference);
    }
}

#[when(expr = "the payment provider is offline")]
async fn provider_offline(world: &mut LedgerWorld) {
    world.system().gateway.set_failing(true);
}

#[when(expr = "the provider reports {string} for deposit {word} {int} times")]
async fn report_outcome_many(world: &mut LedgerWorld, outcome: String, reference: String, times: i64) {
    for _ in 0..times {
        report(world, &outcome, &reference).await;
    }
}

#[when(expr = "the provider reports {string} for deposit {word}")]
async fn report_outcome(world: &mut LedgerWorld, outcome: String, reference: String) {
    report(world, &outcome, &reference).await;
}

#[when(expr = "the provider reports {string} for the last deposit")]
async fn report_outcome_last(world: &mut LedgerWorld, outcome: String) {
    let reference = world.last_deposit.clone().expect("No deposit has been started");
    report(world, &outcome, &reference).await;
}

async fn report(world: &mut LedgerWorld, outcome: &str, reference: &str) {
    let payload = format!(r#"{{"event":"charge.{outcome}","data":{{"reference":"{reference}"}}}}"#);
    let result = world.system().deposits.apply_outcome(reference, DepositOutcome::from(outcome), Some(payload)).await;
    world.record(result);
}

#[then("the operation succeeds")]
async fn operation_succeeds(world: &mut LedgerWorld) {
    if let Some(e) = &world.last_error {
        panic!("Expected the last operation to succeed, but it failed with {e}");
    }
}

#[then(expr = "the operation fails with {word}")]
async fn operation_fails(world: &mut LedgerWorld, kind: String) {
    let e = world.last_error.as_ref().expect("Expected the last operation to fail, but it succeeded");
    assert_eq!(error_kind(e), kind, "Unexpected error: {e}");
}

#[then(expr = "'{word}' has a balance of {int}")]
async fn check_balance(world: &mut LedgerWorld, owner: String, balance: i64) {
    let wallet = world.wallet_of(&owner).await;
    assert_eq!(wallet.balance, MinorUnits::from(balance), "Balance for {owner} is incorrect");
}

#[then(expr = "the sum of all balances for '{word}' and '{word}' is {int}")]
async fn check_sum(world: &mut LedgerWorld, a: String, b: String, total: i64) {
    let a = world.wallet_of(&a).await;
    let b = world.wallet_of(&b).await;
    assert_eq!(a.balance + b.balance, MinorUnits::from(total));
}

#[then(expr = "'{word}' has {int} ledger entries")]
async fn check_entry_count(world: &mut LedgerWorld, owner: String, count: usize) {
    let wallet = world.wallet_of(&owner).await;
    let entries = world.system().db.fetch_entries_for_wallet(wallet.id).await.expect("Error fetching entries");
    assert_eq!(entries.len(), count, "Wrong number of entries for {owner}");
}

#[then(expr = "the latest entry for '{word}' is a {word} of {int} with counterparty '{word}'")]
async fn check_latest_entry(world: &mut LedgerWorld, owner: String, direction: String, amount: i64, other: String) {
    let wallet = world.wallet_of(&owner).await;
    let counterparty = world.wallet_of(&other).await;
    let entries = world.system().db.fetch_entries_for_wallet(wallet.id).await.expect("Error fetching entries");
    let latest = entries.first().expect("No ledger entries");
    let expected = match direction.as_str() {
        "debit" => Direction::Debit,
        "credit" => Direction::Credit,
        d => panic!("Unknown direction {d}"),
    };
    assert_eq!(latest.direction, expected);
    assert_eq!(latest.status, EntryStatus::Success);
    assert_eq!(latest.amount, MinorUnits::from(amount));
    assert_eq!(latest.counterparty_number.as_deref(), Some(counterparty.number.as_str()));
}

#[then(expr = "deposit {word} has status {word}")]
async fn check_deposit_status(world: &mut LedgerWorld, reference: String, status: String) {
    deposit_has_status(world, &reference, &status).await;
}

#[then(expr = "the last deposit has status {word}")]
async fn check_last_deposit_status(world: &mut LedgerWorld, status: String) {
    let reference = world.last_deposit.clone().expect("No deposit has been started");
    deposit_has_status(world, &reference, &status).await;
}

async fn deposit_has_status(world: &LedgerWorld, reference: &str, status: &str) {
    let entry = world
        .system()
        .db
        .fetch_entry(reference)
        .await
        .expect("Error fetching entry")
        .unwrap_or_else(|| panic!("Deposit {reference} does not exist"));
    let expected = status.parse::<EntryStatus>().unwrap_or_else(|e| panic!("Bad status in feature file. {e}"));
    assert_eq!(entry.status, expected);
}
