//! Transfer coordination between two independently locked accounts
//!
//! `TransferCoordinator` moves money from one account to another while other
//! tasks do the same on overlapping account pairs.
//!
//! # Algorithm
//!
//! ```text
//! same account?          -> SameAccount
//! lookup from / to       -> AccountNotFound
//! advisory balance check -> InsufficientBalance
//! repeat up to max_attempts:
//!     both accounts unlocked?  -> lock both (ascending id), mutate, persist,
//!                                 unlock, notify -> Completed | Declined
//!     otherwise                -> random sleep in [0, max_backoff)
//! -> TimedOut
//! ```
//!
//! # Deadlock Freedom
//!
//! A transfer never blocks on a lock while another transfer could be waiting
//! for a lock it holds: both locks are taken only after the non-blocking probe
//! found both accounts free, and always in ascending account-id order, so two
//! opposite transfers cannot each hold one side and wait for the other.
//!
//! # Cancellation
//!
//! The backoff sleep races against a [`CancellationToken`]. A cancelled
//! transfer returns [`TransferError::Interrupted`]; no lock is held at that
//! point and nothing has been mutated.

use super::notifier::{credit_message, debit_message};
use super::traits::{AccountStore, Notifier};
use crate::types::{Account, BalanceGuard, TransferError, TransferOutcome, TransferRequest};
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default number of lock attempts before a transfer times out
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default exclusive upper bound of the randomized backoff
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(1000);

/// Contention settings for the transfer coordinator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    /// Attempts made before returning `TimedOut`
    pub max_attempts: u32,
    /// Each backoff sleeps a random duration in `[0, max_backoff)`
    pub max_backoff: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl TransferConfig {
    /// Create a TransferConfig, falling back to defaults for zero values
    pub fn new(max_attempts: u32, max_backoff: Duration) -> Self {
        let default = Self::default();

        let max_attempts = if max_attempts == 0 {
            tracing::warn!(
                max_attempts,
                default = default.max_attempts,
                "invalid max_attempts, using default"
            );
            default.max_attempts
        } else {
            max_attempts
        };

        let max_backoff = if max_backoff.is_zero() {
            tracing::warn!(
                default_ms = default.max_backoff.as_millis() as u64,
                "invalid max_backoff, using default"
            );
            default.max_backoff
        } else {
            max_backoff
        };

        Self {
            max_attempts,
            max_backoff,
        }
    }
}

/// Executes transfers between accounts held in an [`AccountStore`]
///
/// Cheap to clone; clones share the store, the notifier and the cancellation
/// token.
#[derive(Clone)]
pub struct TransferCoordinator {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    config: TransferConfig,
    cancellation: CancellationToken,
}

impl TransferCoordinator {
    /// Create a coordinator with the default contention settings
    pub fn new(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            config: TransferConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: TransferConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `token` to interrupt transfers that are backing off
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Move `request.amount` from `request.from_id` to `request.to_id`
    ///
    /// The amount is assumed positive; see [`TransferRequest::new`].
    ///
    /// # Returns
    ///
    /// * `Ok(TransferOutcome::Completed)` - both legs applied and persisted
    /// * `Ok(TransferOutcome::Declined)` - the source dropped below the amount
    ///   between the pre-check and the locked section; nothing changed
    /// * `Ok(TransferOutcome::TimedOut { .. })` - the accounts stayed busy for
    ///   every attempt; nothing changed
    ///
    /// # Errors
    ///
    /// * `SameAccount` - source and destination are the same id
    /// * `AccountNotFound` - an account is unknown, or vanished before persistence
    /// * `InsufficientBalance` - the advisory pre-check failed
    /// * `TransferFailed` - a balance could not be adjusted; nothing changed
    /// * `Interrupted` - cancelled while backing off
    pub async fn transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        let TransferRequest {
            from_id,
            to_id,
            amount,
        } = request;
        let amount = *amount;
        debug_assert!(amount > Decimal::ZERO, "transfer amount must be positive");

        if from_id == to_id {
            return Err(TransferError::same_account(from_id));
        }

        let from = self
            .store
            .get(from_id)
            .ok_or_else(|| TransferError::account_not_found(from_id))?;
        let to = self
            .store
            .get(to_id)
            .ok_or_else(|| TransferError::account_not_found(to_id))?;

        // Advisory only: not re-raised inside the locked section
        if !from.has_sufficient_balance(amount) {
            return Err(TransferError::insufficient_balance(
                from_id,
                from.balance(),
                amount,
            ));
        }

        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            if !from.is_locked() && !to.is_locked() {
                let outcome = self.apply(&from, &to, amount)?;
                if outcome == TransferOutcome::Completed {
                    tracing::info!(from = %from_id, to = %to_id, %amount, attempt, "transfer completed");
                    self.notify(&from, &to, amount);
                }
                return Ok(outcome);
            }

            tracing::debug!(
                from = %from_id,
                to = %to_id,
                attempt,
                max_attempts,
                "waiting for both accounts to be unlocked"
            );

            if attempt < max_attempts {
                self.backoff().await.inspect_err(|_| {
                    tracing::info!(from = %from_id, to = %to_id, attempt, "transfer interrupted");
                })?;
            }
        }

        tracing::info!(
            from = %from_id,
            to = %to_id,
            attempts = max_attempts,
            "transfer timed out waiting for account locks"
        );
        Ok(TransferOutcome::TimedOut {
            attempts: max_attempts,
        })
    }

    /// The locked section: debit, credit, persist
    ///
    /// Every exit path drops both guards. On error both balances are put back
    /// to what they were when the locks were taken.
    fn apply(
        &self,
        from: &Arc<Account>,
        to: &Arc<Account>,
        amount: Decimal,
    ) -> Result<TransferOutcome, TransferError> {
        let (mut from_guard, mut to_guard) = lock_pair(from, to);

        let from_balance = from_guard.balance();
        let to_balance = to_guard.balance();

        if from_balance < amount {
            tracing::info!(
                from = from.id(),
                to = to.id(),
                balance = %from_balance,
                %amount,
                "transfer declined, source balance changed before the accounts were locked"
            );
            return Ok(TransferOutcome::Declined);
        }

        let failed =
            |error: TransferError| TransferError::transfer_failed(from.id(), to.id(), &error.to_string());

        from_guard.adjust_balance(-amount).map_err(failed)?;

        if let Err(error) = to_guard.adjust_balance(amount) {
            from_guard.restore_balance(from_balance);
            return Err(failed(error));
        }

        if let Err(error) = self.store.update(from).and_then(|()| self.store.update(to)) {
            from_guard.restore_balance(from_balance);
            to_guard.restore_balance(to_balance);
            return Err(error);
        }

        Ok(TransferOutcome::Completed)
    }

    /// Tell both parties; failures are logged and otherwise ignored
    fn notify(&self, from: &Account, to: &Account, amount: Decimal) {
        let legs = [
            (from, debit_message(amount, to.id())),
            (to, credit_message(amount, from.id())),
        ];

        for (account, message) in legs {
            if let Err(error) = self.notifier.notify_about_transfer(account, &message) {
                tracing::warn!(account = account.id(), %error, "transfer notification failed");
            }
        }
    }

    async fn backoff(&self) -> Result<(), TransferError> {
        let delay = self.backoff_delay();

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(TransferError::Interrupted),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// Random duration in `[0, max_backoff)`
    fn backoff_delay(&self) -> Duration {
        let max_micros = self.config.max_backoff.as_micros() as u64;
        if max_micros == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(rand::thread_rng().gen_range(0..max_micros))
    }
}

/// Lock both accounts in ascending id order, returning `(from, to)` guards
fn lock_pair<'a>(from: &'a Account, to: &'a Account) -> (BalanceGuard<'a>, BalanceGuard<'a>) {
    if from.id() <= to.id() {
        let from_guard = from.lock();
        let to_guard = to.lock();
        (from_guard, to_guard)
    } else {
        let to_guard = to.lock();
        let from_guard = from.lock();
        (from_guard, to_guard)
    }
}
