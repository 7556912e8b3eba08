//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the Account entity and its scoped lock guard
//! - `transfer`: transfer requests and outcomes
//! - `error`: error types for account transfers

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId, BalanceGuard};
pub use error::{NotificationError, TransferError};
pub use transfer::{TransferOutcome, TransferRequest};
