//! Default transfer notifier
//!
//! Delivery to account holders belongs to an outer system; this notifier
//! records each message as a structured `tracing` event so the information is
//! still observable when no such system is plugged in.

use super::traits::Notifier;
use crate::types::{Account, NotificationError};

/// Notifier that emits one `info` event per message
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LoggingNotifier {
    fn notify_about_transfer(
        &self,
        account: &Account,
        message: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(account = account.id(), %message, "transfer notification");
        Ok(())
    }
}

/// Message sent to the debited account
pub(crate) fn debit_message(amount: rust_decimal::Decimal, to_id: &str) -> String {
    format!("Transferred {} to account {}", amount, to_id)
}

/// Message sent to the credited account
pub(crate) fn credit_message(amount: rust_decimal::Decimal, from_id: &str) -> String {
    format!("Received {} from account {}", amount, from_id)
}
