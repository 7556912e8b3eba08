//! Core traits for account storage and transfer notification
//!
//! These are the seams the transfer coordinator talks through: it owns neither
//! the accounts nor the delivery channel for notifications.

use crate::types::{Account, NotificationError, TransferError};
use std::sync::Arc;

/// Keyed store of accounts
///
/// The store owns every account; callers receive shared handles that they
/// must not keep beyond the operation they were fetched for. Lookups must
/// never wait on an account's transfer lock.
pub trait AccountStore: Send + Sync {
    /// Insert a new account, failing with `DuplicateId` if the id is taken
    fn create(&self, account: Account) -> Result<Arc<Account>, TransferError>;

    /// Look up an account by id
    fn get(&self, id: &str) -> Option<Arc<Account>>;

    /// Replace the stored account, failing with `AccountNotFound` if absent
    fn update(&self, account: &Arc<Account>) -> Result<(), TransferError>;

    /// Remove every account
    fn clear(&self);

    /// Snapshot of all stored accounts
    fn get_all_accounts(&self) -> Vec<Arc<Account>>;
}

/// Receives a message for each leg of a completed transfer
///
/// Delivery is best-effort: errors are logged by the caller and never undo
/// the transfer.
pub trait Notifier: Send + Sync {
    fn notify_about_transfer(
        &self,
        account: &Account,
        message: &str,
    ) -> Result<(), NotificationError>;
}
