//! Transfer request and outcome types

use super::account::AccountId;
use super::error::TransferError;
use rust_decimal::Decimal;

/// A request to move `amount` from one account to another
///
/// Requests are ephemeral: validated, executed and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Account to debit
    pub from_id: AccountId,

    /// Account to credit
    pub to_id: AccountId,

    /// Strictly positive amount to move
    pub amount: Decimal,
}

impl TransferRequest {
    /// Build a validated request
    ///
    /// Rejects empty account ids and non-positive amounts. Same-account
    /// requests are accepted here and rejected by the coordinator.
    pub fn new(
        from_id: impl Into<AccountId>,
        to_id: impl Into<AccountId>,
        amount: Decimal,
    ) -> Result<Self, TransferError> {
        let from_id = from_id.into();
        let to_id = to_id.into();

        if from_id.trim().is_empty() || to_id.trim().is_empty() {
            return Err(TransferError::invalid_request(
                "account ids must not be empty",
            ));
        }

        if amount <= Decimal::ZERO {
            return Err(TransferError::invalid_request(&format!(
                "transfer amount must be positive, got {}",
                amount
            )));
        }

        Ok(Self {
            from_id,
            to_id,
            amount,
        })
    }
}

/// Non-exceptional result of a transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both legs applied and persisted
    Completed,

    /// Both locks were obtained but the source no longer covered the amount;
    /// nothing was changed
    Declined,

    /// Contention lasted for every allowed attempt; nothing was changed
    TimedOut {
        /// Number of attempts made before giving up
        attempts: u32,
    },
}
