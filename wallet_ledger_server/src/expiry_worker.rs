use std::time::Duration as StdDuration;

use chrono::Duration;
use log::*;
use tokio::task::JoinHandle;
use wallet_ledger_engine::{db_types::LedgerEntry, DepositFlowApi, LedgerDatabase, PaymentGateway};

/// Starts the pending-deposit expiry worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `interval`, deposits that have been pending for longer than `timeout` are failed. The worker runs on the
/// current (actix) thread, so the ledger futures need not be `Send`.
pub fn start_expiry_worker<B, G>(api: DepositFlowApi<B, G>, timeout: Duration, interval: StdDuration) -> JoinHandle<()>
where
    B: LedgerDatabase + 'static,
    G: PaymentGateway + 'static,
{
    actix_web::rt::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        info!("🕰️ Pending deposit expiry worker started");
        loop {
            timer.tick().await;
            trace!("🕰️ Running pending deposit expiry job");
            match api.expire_stale_deposits(timeout).await {
                Ok(result) => {
                    if result.total_count() > 0 {
                        info!("🕰️ {} deposits expired", result.expired_count());
                        debug!("🕰️ Expired deposits: {}", entry_list(&result.expired));
                    }
                    for (reference, e) in &result.errors {
                        warn!("🕰️ Could not expire deposit {reference}. {e}");
                    }
                },
                Err(e) => {
                    error!("🕰️ Error running pending deposit expiry job: {e}");
                },
            }
        }
    })
}

fn entry_list(entries: &[LedgerEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[{}] {} {} wallet: {}", e.id, e.reference, e.amount, e.wallet_id))
        .collect::<Vec<String>>()
        .join(", ")
}
