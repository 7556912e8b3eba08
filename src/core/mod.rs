//! Core business logic module
//!
//! This module contains the account and transfer components:
//! - `traits` - Seams for account storage and notification
//! - `account_store` - Concurrent in-memory account store
//! - `notifier` - Default logging notifier
//! - `coordinator` - The transfer coordination algorithm
//! - `service` - Inbound account operations
//! - `batch_processor` - Concurrent execution of many transfer requests

pub mod account_store;
pub mod batch_processor;
pub mod coordinator;
pub mod notifier;
pub mod service;
pub mod traits;

pub use account_store::InMemoryAccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult, RunSummary};
pub use coordinator::{TransferConfig, TransferCoordinator};
pub use notifier::LoggingNotifier;
pub use service::AccountService;
pub use traits::{AccountStore, Notifier};
