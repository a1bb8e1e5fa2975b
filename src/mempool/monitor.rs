//! Pending-transaction polling loop.
//!
//! Installs an `eth_newPendingTransactionFilter` on the node and polls it
//! on a fixed interval. Each new hash is handed to a bounded pool of
//! evaluation tasks; when every slot is busy the hash is dropped, since a
//! stale mempool observation is worthless by the time a slot frees up.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{TxHash, B256, U256};
use alloy::providers::{DynProvider, Provider};
use anyhow::Result;
use tokio::sync::Semaphore;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::evaluator::{Evaluation, Evaluator};
use crate::types::PendingTx;

pub async fn run(provider: DynProvider, config: Arc<BotConfig>) -> Result<()> {
    let evaluator = Arc::new(Evaluator::new(provider.clone(), config.clone()));
    let slots = Arc::new(Semaphore::new(config.worker_count));

    info!(
        workers = config.worker_count,
        poll_ms = config.poll_interval_ms,
        "mempool monitor started"
    );

    // Reinstalled lazily after any poll error; some nodes expire idle
    // filters and answer subsequent polls with "filter not found".
    let mut filter_id: Option<U256> = None;
    let mut ticker = interval(Duration::from_millis(config.poll_interval_ms));

    loop {
        ticker.tick().await;

        let id = match filter_id {
            Some(id) => id,
            None => match provider.new_pending_transactions_filter(false).await {
                Ok(id) => {
                    debug!(filter = %id, "pending transaction filter installed");
                    filter_id = Some(id);
                    id
                }
                Err(err) => {
                    warn!(error = %err, "failed to install pending filter, will retry");
                    continue;
                }
            },
        };

        let hashes = match provider.get_filter_changes::<B256>(id).await {
            Ok(hashes) => hashes,
            Err(err) => {
                warn!(error = %err, "filter poll failed, reinstalling filter");
                filter_id = None;
                continue;
            }
        };

        for hash in hashes {
            match slots.clone().try_acquire_owned() {
                Ok(permit) => {
                    let evaluator = evaluator.clone();
                    let provider = provider.clone();
                    let config = config.clone();
                    tokio::spawn(async move {
                        handle(&provider, &evaluator, &config, hash).await;
                        drop(permit);
                    });
                }
                Err(_) => {
                    debug!(tx = %hash, "all evaluation slots busy, dropping hash");
                }
            }
        }
    }
}

async fn handle(provider: &DynProvider, evaluator: &Evaluator, config: &BotConfig, hash: TxHash) {
    // Pending transactions vanish quickly; a miss here is routine.
    let tx = match provider.get_transaction_by_hash(hash).await {
        Ok(Some(tx)) => tx,
        Ok(None) => {
            debug!(tx = %hash, "transaction no longer available");
            return;
        }
        Err(err) => {
            debug!(tx = %hash, error = %err, "transaction fetch failed");
            return;
        }
    };

    let pending = PendingTx::from_rpc(hash, &tx);
    match evaluator.evaluate(&pending).await {
        Ok(Evaluation::Report(report)) => report.render(config.report_json),
        Ok(Evaluation::Skipped(reason)) => {
            debug!(tx = %hash, %reason, "skipped");
        }
        Err(err) => {
            debug!(tx = %hash, error = %err, "evaluation aborted");
        }
    }
}
