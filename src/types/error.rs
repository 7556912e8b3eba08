//! Error types for account transfers
//!
//! This module defines all error types that can occur while loading accounts,
//! reading transfer requests and executing transfers.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid data types, etc.
//! - **Request Errors**: Same-account transfers, unknown or duplicate accounts
//! - **Transfer Errors**: Failures inside the locked section, interruption
//!
//! Contended transfers that run out of attempts are not errors; they are
//! reported through [`TransferOutcome::TimedOut`](super::TransferOutcome).

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for account transfers
///
/// Each variant includes enough context to be logged on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A request failed upstream validation (empty id, non-positive amount, ...)
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the validation failure
        message: String,
    },

    /// Transfer requested between identical source and destination
    #[error("Cannot transfer from account {id} to itself")]
    SameAccount {
        /// The account id used on both sides
        id: String,
    },

    /// Account absent at lookup, or vanished before persistence
    #[error("Account {id} not found")]
    AccountNotFound {
        /// The missing account id
        id: String,
    },

    /// The advisory balance pre-check failed
    #[error("Insufficient balance in account {id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Source account id
        id: String,
        /// Balance observed by the pre-check
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Account creation collided with an existing id
    #[error("Account {id} already exists")]
    DuplicateId {
        /// The colliding account id
        id: String,
    },

    /// A balance could not be computed
    ///
    /// Raised by `adjust_balance` instead of writing a corrupted value.
    #[error("Invalid state for account {id}: {message}")]
    InvalidState {
        /// Account id
        id: String,
        /// What went wrong
        message: String,
    },

    /// Unexpected failure inside the locked section of a transfer
    ///
    /// Locks are released and neither balance is left modified.
    #[error("Transfer from {from} to {to} failed: {message}")]
    TransferFailed {
        /// Source account id
        from: String,
        /// Destination account id
        to: String,
        /// Underlying cause
        message: String,
    },

    /// The transfer was cancelled while waiting for the accounts to be free
    #[error("Transfer interrupted while waiting for account locks")]
    Interrupted,
}

/// Error returned by a [`Notifier`](crate::core::Notifier)
///
/// Never turns a completed transfer into a failure; the coordinator only logs it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Notification to account {account} failed: {message}")]
pub struct NotificationError {
    /// Account the notification was addressed to
    pub account: String,
    /// Description of the failure
    pub message: String,
}

// Conversion from io::Error to TransferError
impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        TransferError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to TransferError
impl From<csv::Error> for TransferError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        TransferError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl TransferError {
    /// Create a SameAccount error
    pub fn same_account(id: &str) -> Self {
        TransferError::SameAccount { id: id.to_string() }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        TransferError::AccountNotFound { id: id.to_string() }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(id: &str, balance: Decimal, requested: Decimal) -> Self {
        TransferError::InsufficientBalance {
            id: id.to_string(),
            balance,
            requested,
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(id: &str) -> Self {
        TransferError::DuplicateId { id: id.to_string() }
    }

    /// Create an InvalidState error
    pub fn invalid_state(id: &str, message: &str) -> Self {
        TransferError::InvalidState {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a TransferFailed error
    pub fn transfer_failed(from: &str, to: &str, message: &str) -> Self {
        TransferError::TransferFailed {
            from: from.to_string(),
            to: to.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an InvalidRequest error
    pub fn invalid_request(message: &str) -> Self {
        TransferError::InvalidRequest {
            message: message.to_string(),
        }
    }
}
