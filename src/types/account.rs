//! Account entity with an embedded per-account lock
//!
//! An `Account` owns two pieces of synchronization:
//!
//! - an exclusive **transfer lock**, held for the whole locked section of a
//!   transfer and probed without blocking through [`Account::is_locked`];
//! - a short-lived **balance cell** lock, taken only to copy or replace the
//!   decimal value, so balance reads never wait for a transfer to finish and
//!   never observe a half-written value.
//!
//! The only way to change a balance is through [`BalanceGuard`], which can
//! only be obtained by acquiring the transfer lock.

use super::error::TransferError;
use parking_lot::{Mutex, MutexGuard, RwLock};
use rust_decimal::Decimal;

/// Account identifier
///
/// Non-empty, unique and immutable once the account is created.
pub type AccountId = String;

/// A balance-holding account guarded by its own exclusive lock
#[derive(Debug)]
pub struct Account {
    id: AccountId,

    /// Current balance; written only while `lock` is held
    balance: RwLock<Decimal>,

    /// Exclusive transfer lock, never shared across accounts
    lock: Mutex<()>,
}

impl Account {
    /// Create an account with the given opening balance
    pub fn new(id: impl Into<AccountId>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            balance: RwLock::new(balance),
            lock: Mutex::new(()),
        }
    }

    /// Create an account with a zero balance
    pub fn with_zero_balance(id: impl Into<AccountId>) -> Self {
        Self::new(id, Decimal::ZERO)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Consistent snapshot of the current balance
    ///
    /// Safe to call while another thread holds the transfer lock.
    pub fn balance(&self) -> Decimal {
        *self.balance.read()
    }

    /// Whether the balance covers `amount`
    ///
    /// Does not take the transfer lock, so the answer can be stale by the time
    /// the caller acts on it.
    pub fn has_sufficient_balance(&self, amount: Decimal) -> bool {
        self.balance() >= amount
    }

    /// Advisory probe: is the transfer lock currently held by anyone?
    ///
    /// Only meant for back-off decisions; the state can change right after
    /// this returns.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Acquire the transfer lock, blocking until it is free
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock(&self) -> BalanceGuard<'_> {
        BalanceGuard {
            account: self,
            _lock: self.lock.lock(),
        }
    }

    /// Try to acquire the transfer lock without blocking
    pub fn try_lock(&self) -> Option<BalanceGuard<'_>> {
        self.lock.try_lock().map(|lock| BalanceGuard {
            account: self,
            _lock: lock,
        })
    }
}

/// Scoped exclusive access to an account's balance
///
/// Holding a `BalanceGuard` means holding the account's transfer lock.
#[derive(Debug)]
pub struct BalanceGuard<'a> {
    account: &'a Account,
    _lock: MutexGuard<'a, ()>,
}

impl BalanceGuard<'_> {
    pub fn account(&self) -> &Account {
        self.account
    }

    pub fn balance(&self) -> Decimal {
        self.account.balance()
    }

    /// Apply `balance += delta` (negative `delta` withdraws)
    ///
    /// Returns the new balance. Fails with `InvalidState` if the result cannot
    /// be represented; the stored balance is left untouched in that case.
    pub fn adjust_balance(&mut self, delta: Decimal) -> Result<Decimal, TransferError> {
        let mut balance = self.account.balance.write();
        let updated = balance.checked_add(delta).ok_or_else(|| {
            TransferError::invalid_state(
                &self.account.id,
                &format!("balance {} cannot be adjusted by {}", *balance, delta),
            )
        })?;
        *balance = updated;
        Ok(updated)
    }

    /// Put back a balance previously read through this guard
    pub(crate) fn restore_balance(&mut self, balance: Decimal) {
        *self.account.balance.write() = balance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_account() {
        let account = Account::new("ac1", dec!(30));

        assert_eq!(account.id(), "ac1");
        assert_eq!(account.balance(), dec!(30));
        assert!(!account.is_locked());
    }

    #[test]
    fn test_with_zero_balance() {
        let account = Account::with_zero_balance("ac1");
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[rstest]
    #[case::more_than_enough(dec!(30), dec!(10), true)]
    #[case::exact(dec!(30), dec!(30), true)]
    #[case::one_cent_short(dec!(30), dec!(30.01), false)]
    #[case::empty(dec!(0), dec!(0.0001), false)]
    fn test_has_sufficient_balance(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
        #[case] expected: bool,
    ) {
        let account = Account::new("ac1", balance);
        assert_eq!(account.has_sufficient_balance(amount), expected);
    }

    #[test]
    fn test_lock_is_observable_and_released_on_drop() {
        let account = Account::new("ac1", dec!(30));

        let guard = account.lock();
        assert!(account.is_locked());
        assert!(account.try_lock().is_none());

        drop(guard);
        assert!(!account.is_locked());
        assert!(account.try_lock().is_some());
    }

    #[test]
    fn test_balance_readable_while_locked() {
        let account = Account::new("ac1", dec!(30));

        let mut guard = account.lock();
        guard.adjust_balance(dec!(-10)).unwrap();

        assert_eq!(account.balance(), dec!(20));
        assert!(account.has_sufficient_balance(dec!(20)));
    }

    #[rstest]
    #[case::deposit(dec!(30), dec!(10.5), dec!(40.5))]
    #[case::withdrawal(dec!(30), dec!(-10), dec!(20))]
    #[case::to_zero(dec!(30), dec!(-30), dec!(0))]
    fn test_adjust_balance(
        #[case] initial: Decimal,
        #[case] delta: Decimal,
        #[case] expected: Decimal,
    ) {
        let account = Account::new("ac1", initial);
        let mut guard = account.lock();

        assert_eq!(guard.adjust_balance(delta).unwrap(), expected);
        assert_eq!(guard.balance(), expected);
    }

    #[test]
    fn test_adjust_balance_overflow_is_invalid_state() {
        let account = Account::new("ac1", Decimal::MAX);
        let mut guard = account.lock();

        let result = guard.adjust_balance(dec!(1));

        assert!(matches!(result, Err(TransferError::InvalidState { .. })));
        assert_eq!(guard.balance(), Decimal::MAX);
    }

    #[test]
    fn test_concurrent_adjustments_are_serialized() {
        use std::sync::Arc;
        use std::thread;

        let account = Arc::new(Account::with_zero_balance("ac1"));
        let mut handles = vec![];

        for _ in 0..50 {
            let account = Arc::clone(&account);
            handles.push(thread::spawn(move || {
                let mut guard = account.lock();
                guard.adjust_balance(dec!(0.01)).unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(account.balance(), dec!(0.50));
    }
}
