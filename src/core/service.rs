//! Inbound account operations
//!
//! `AccountService` is what an outer layer (CLI, HTTP handler, ...) talks to:
//! it creates and looks up accounts in the store and hands transfers to the
//! coordinator.

use super::coordinator::TransferCoordinator;
use super::traits::AccountStore;
use crate::types::{Account, TransferError, TransferOutcome, TransferRequest};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    coordinator: TransferCoordinator,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, coordinator: TransferCoordinator) -> Self {
        Self { store, coordinator }
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// * `InvalidRequest` - empty id or negative opening balance
    /// * `DuplicateId` - the id is already taken
    pub fn create_account(
        &self,
        id: &str,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, TransferError> {
        if id.trim().is_empty() {
            return Err(TransferError::invalid_request("account id must not be empty"));
        }
        if initial_balance < Decimal::ZERO {
            return Err(TransferError::invalid_request(&format!(
                "initial balance of account {} must not be negative, got {}",
                id, initial_balance
            )));
        }

        let account = self.store.create(Account::new(id, initial_balance))?;
        tracing::info!(account = id, balance = %initial_balance, "account created");
        Ok(account)
    }

    pub fn get_account(&self, id: &str) -> Result<Arc<Account>, TransferError> {
        self.store
            .get(id)
            .ok_or_else(|| TransferError::account_not_found(id))
    }

    /// Validate and execute a transfer
    pub async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
    ) -> Result<TransferOutcome, TransferError> {
        let request = TransferRequest::new(from_id, to_id, amount)?;
        self.execute(&request).await
    }

    /// Execute an already validated transfer request
    pub async fn execute(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        self.coordinator.transfer(request).await
    }

    /// All accounts, sorted by id
    pub fn accounts(&self) -> Vec<Arc<Account>> {
        let mut accounts = self.store.get_all_accounts();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    /// Drop every account; meant for resetting state between test sessions
    pub fn clear(&self) {
        self.store.clear();
    }
}
