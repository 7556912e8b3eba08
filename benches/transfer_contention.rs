//! Benchmark suite for transfer coordination
//!
//! Measures the coordinator on an uncontended pair of accounts and under
//! contention, using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```

use account_transfers::core::{
    AccountStore, InMemoryAccountStore, LoggingNotifier, TransferConfig, TransferCoordinator,
};
use account_transfers::{Account, TransferRequest};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    divan::main();
}

fn coordinator_with(accounts: usize, balance: Decimal) -> TransferCoordinator {
    let store = Arc::new(InMemoryAccountStore::new());
    for id in 0..accounts {
        store
            .create(Account::new(format!("ac{}", id), balance))
            .expect("Account creation failed");
    }
    TransferCoordinator::new(store, Arc::new(LoggingNotifier))
        .with_config(TransferConfig::new(100, Duration::from_micros(200)))
}

fn runtime(workers: usize) -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .expect("Runtime creation failed")
}

/// Single transfers back and forth between two accounts
#[divan::bench(args = [100, 1_000])]
fn uncontended_transfers(bencher: divan::Bencher, count: usize) {
    let runtime = runtime(1);
    let coordinator = coordinator_with(2, Decimal::from(1_000_000));
    let forward = TransferRequest::new("ac0", "ac1", Decimal::ONE).expect("Invalid request");
    let backward = TransferRequest::new("ac1", "ac0", Decimal::ONE).expect("Invalid request");

    bencher.bench_local(|| {
        runtime.block_on(async {
            for i in 0..count {
                let request = if i % 2 == 0 { &forward } else { &backward };
                coordinator
                    .transfer(request)
                    .await
                    .expect("Transfer failed");
            }
        })
    });
}

/// Many tasks transferring around a small ring of accounts
#[divan::bench(args = [2, 8, 32])]
fn contended_ring(bencher: divan::Bencher, accounts: usize) {
    let runtime = runtime(4);
    let coordinator = coordinator_with(accounts, Decimal::from(1_000_000));

    bencher.bench_local(|| {
        runtime.block_on(async {
            let handles: Vec<_> = (0..256)
                .map(|i| {
                    let coordinator = coordinator.clone();
                    let request = TransferRequest::new(
                        format!("ac{}", i % accounts),
                        format!("ac{}", (i + 1) % accounts),
                        Decimal::ONE,
                    )
                    .expect("Invalid request");
                    tokio::spawn(async move { coordinator.transfer(&request).await })
                })
                .collect();

            for handle in handles {
                let _ = handle.await.expect("Transfer task panicked");
            }
        })
    });
}
