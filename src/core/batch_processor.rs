//! Concurrent execution of a batch of transfer requests
//!
//! `BatchProcessor` spawns one tokio task per transfer and keeps at most
//! `max_concurrent` of them in flight. Transfers touching the same accounts
//! are serialized by the accounts' own locks; nothing else orders them.
//!
//! # Guarantees
//!
//! - Every request produces exactly one `ProcessingResult` (unless its task
//!   panics, which is logged)
//! - Errors are captured in results and don't stop the batch
//! - With `max_concurrent == 1` requests run one after another in input order

use super::service::AccountService;
use crate::types::{TransferError, TransferOutcome, TransferRequest};
use futures::stream::{self, StreamExt};

/// Result of executing a single transfer request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was executed
    pub request: TransferRequest,

    /// Outcome or error
    pub result: Result<TransferOutcome, TransferError>,
}

/// Tally of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub declined: usize,
    pub timed_out: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[ProcessingResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, processed| {
                match processed.result {
                    Ok(TransferOutcome::Completed) => summary.completed += 1,
                    Ok(TransferOutcome::Declined) => summary.declined += 1,
                    Ok(TransferOutcome::TimedOut { .. }) => summary.timed_out += 1,
                    Err(_) => summary.failed += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.completed + self.declined + self.timed_out + self.failed
    }
}

#[derive(Clone)]
pub struct BatchProcessor {
    service: AccountService,
    max_concurrent: usize,
}

impl BatchProcessor {
    /// Create a processor running at most `max_concurrent` transfers at once
    ///
    /// A `max_concurrent` of zero is treated as one.
    pub fn new(service: AccountService, max_concurrent: usize) -> Self {
        Self {
            service,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Execute every request, returning results in completion order
    pub async fn process_batch(&self, requests: Vec<TransferRequest>) -> Vec<ProcessingResult> {
        stream::iter(requests)
            .map(|request| {
                let service = self.service.clone();
                tokio::spawn(async move {
                    let result = service.execute(&request).await;
                    ProcessingResult { request, result }
                })
            })
            .buffer_unordered(self.max_concurrent)
            .filter_map(|joined| async move {
                match joined {
                    Ok(processed) => Some(processed),
                    Err(e) => {
                        tracing::error!(error = %e, "transfer task panicked");
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
