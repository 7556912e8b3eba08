//! Account Transfers Library
//! # Overview
//!
//! This library keeps monetary accounts in memory and moves money between
//! them while many transfers run concurrently.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, TransferRequest, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Keyed account storage
//!   - [`core::coordinator`] - Lock coordination, retry and backoff for transfers
//!   - [`core::service`] - Inbound account operations
//!   - [`core::batch_processor`] - Concurrent execution of many transfers
//! - [`io`] - CSV input of accounts and transfers, balance output
//! - [`pipeline`] - The end-to-end run used by the binary
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Transfer Outcomes
//!
//! - **Completed**: both legs applied and persisted, both parties notified
//! - **Declined**: the source no longer covered the amount once locked
//! - **TimedOut**: the accounts stayed busy for every allowed attempt
//!
//! Everything else (same account, unknown account, insufficient balance,
//! failed mutation, interruption) is a [`TransferError`].
//!
//! # Invariants
//!
//! - No balance is ever observed below zero
//! - A transfer applies both legs or neither
//! - The sum of balances of a closed set of accounts never changes

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use core::{AccountService, AccountStore, InMemoryAccountStore, Notifier, TransferCoordinator};
pub use io::write_balances_csv;
pub use types::{Account, AccountId, TransferError, TransferOutcome, TransferRequest};
