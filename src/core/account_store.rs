//! Thread-safe in-memory account store
//!
//! `InMemoryAccountStore` keeps accounts in a `DashMap` keyed by account id.
//! The map only guards membership; each account's balance is guarded by the
//! account's own lock, so lookups proceed while transfers are in flight.

use super::traits::AccountStore;
use crate::types::{Account, AccountId, TransferError};
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent account store backed by `DashMap`
///
/// Stored values are `Arc<Account>`, so `update` with the same handle that was
/// mutated in place is a pointer swap. Implementations that copy on write can
/// rely on the same contract.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create(&self, account: Account) -> Result<Arc<Account>, TransferError> {
        let id = account.id().to_string();
        let candidate = Arc::new(account);
        let mut inserted = false;

        // The entry holds the shard lock, so two creators of the same id
        // cannot both observe a vacant slot.
        let entry = self.accounts.entry(id.clone()).or_insert_with(|| {
            inserted = true;
            Arc::clone(&candidate)
        });
        drop(entry);

        if inserted {
            Ok(candidate)
        } else {
            Err(TransferError::duplicate_id(&id))
        }
    }

    fn get(&self, id: &str) -> Option<Arc<Account>> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    fn update(&self, account: &Arc<Account>) -> Result<(), TransferError> {
        match self.accounts.get_mut(account.id()) {
            Some(mut entry) => {
                *entry.value_mut() = Arc::clone(account);
                Ok(())
            }
            None => Err(TransferError::account_not_found(account.id())),
        }
    }

    fn clear(&self) {
        self.accounts.clear();
    }

    fn get_all_accounts(&self) -> Vec<Arc<Account>> {
        self.accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}
