//! End-to-end processing: open accounts, run transfers, report balances
//!
//! # Architecture
//!
//! ```text
//! process()
//!     ├── tokio multi-threaded runtime (max_concurrent workers)
//!     ├── Ctrl-C watcher -> CancellationToken
//!     └── run()
//!         ├── read_accounts  -> AccountService::create_account
//!         ├── read_transfers -> BatchProcessor::process_batch
//!         │                       └── TransferCoordinator (per request)
//!         └── write_balances_csv
//! ```
//!
//! Row-level problems (malformed rows, duplicate accounts, failed transfers)
//! are logged and skipped. Only fatal I/O problems end the run with an error.

use crate::core::{
    AccountService, AccountStore, BatchProcessor, InMemoryAccountStore, LoggingNotifier,
    RunSummary, TransferConfig, TransferCoordinator,
};
use crate::io::{read_accounts, read_transfers, write_balances_csv};
use crate::types::{TransferError, TransferOutcome};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Settings for a processing run
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Maximum number of transfers in flight, also the worker thread count
    pub max_concurrent: usize,
    /// Contention settings handed to the coordinator
    pub transfer: TransferConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get(),
            transfer: TransferConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a PipelineConfig, falling back to the default concurrency for zero
    pub fn new(max_concurrent: usize, transfer: TransferConfig) -> Self {
        let max_concurrent = if max_concurrent == 0 {
            let default = num_cpus::get();
            tracing::warn!(max_concurrent, default, "invalid max_concurrent, using default");
            default
        } else {
            max_concurrent
        };

        Self {
            max_concurrent,
            transfer,
        }
    }
}

/// Run the whole pipeline on a dedicated runtime
///
/// Ctrl-C cancels transfers that are waiting for contended accounts; they are
/// counted as failed and the balances are still written.
pub fn process(
    accounts_path: &Path,
    transfers_path: &Path,
    config: &PipelineConfig,
    output: &mut dyn Write,
) -> Result<RunSummary, TransferError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.max_concurrent)
        .enable_all()
        .build()
        .map_err(|e| TransferError::IoError {
            message: format!("failed to create tokio runtime: {}", e),
        })?;

    runtime.block_on(async {
        let cancellation = CancellationToken::new();
        let watcher = tokio::spawn(cancel_on_ctrl_c(cancellation.clone()));

        let result = run(accounts_path, transfers_path, config, cancellation, output).await;

        watcher.abort();
        result
    })
}

async fn cancel_on_ctrl_c(cancellation: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("interrupt received, cancelling waiting transfers");
        cancellation.cancel();
    }
}

/// Open the accounts, execute the transfers and write the final balances
pub async fn run(
    accounts_path: &Path,
    transfers_path: &Path,
    config: &PipelineConfig,
    cancellation: CancellationToken,
    output: &mut dyn Write,
) -> Result<RunSummary, TransferError> {
    let store: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
    let coordinator = TransferCoordinator::new(Arc::clone(&store), Arc::new(LoggingNotifier))
        .with_config(config.transfer.clone())
        .with_cancellation(cancellation);
    let service = AccountService::new(store, coordinator);

    for row in read_accounts(accounts_path)? {
        if let Err(e) = row.and_then(|seed| service.create_account(&seed.id, seed.balance)) {
            tracing::warn!(error = %e, "skipping account row");
        }
    }

    let mut requests = Vec::new();
    for row in read_transfers(transfers_path)? {
        match row {
            Ok(request) => requests.push(request),
            Err(e) => tracing::warn!(error = %e, "skipping transfer row"),
        }
    }

    let processor = BatchProcessor::new(service.clone(), config.max_concurrent);
    let results = processor.process_batch(requests).await;

    for processed in &results {
        let request = &processed.request;
        match &processed.result {
            Ok(TransferOutcome::Completed) => {}
            Ok(outcome) => tracing::info!(
                from = %request.from_id,
                to = %request.to_id,
                amount = %request.amount,
                ?outcome,
                "transfer not applied"
            ),
            Err(e) => tracing::warn!(
                from = %request.from_id,
                to = %request.to_id,
                amount = %request.amount,
                error = %e,
                "transfer failed"
            ),
        }
    }

    let summary = RunSummary::from_results(&results);
    tracing::info!(
        completed = summary.completed,
        declined = summary.declined,
        timed_out = summary.timed_out,
        failed = summary.failed,
        "run finished"
    );

    write_balances_csv(&service.accounts(), output)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_concurrent, num_cpus::get());
        assert_eq!(config.transfer, TransferConfig::default());
    }

    #[test]
    fn test_zero_concurrency_falls_back_to_default() {
        let config = PipelineConfig::new(0, TransferConfig::default());
        assert_eq!(config.max_concurrent, num_cpus::get());
    }

    #[test]
    fn test_custom_config() {
        let transfer = TransferConfig::new(3, Duration::from_millis(20));
        let config = PipelineConfig::new(2, transfer.clone());

        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.transfer, transfer);
    }
}
