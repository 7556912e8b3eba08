//! CSV format handling for account seeds, transfer requests and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserialization
//! - Conversion from rows to domain types
//! - Balance output serialization
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Formats
//!
//! ```text
//! accounts.csv    transfers.csv      output
//! account,balance from,to,amount     account,balance
//! ac1,30          ac1,ac2,10         ac1,20.0000
//! ```

use crate::types::{Account, AccountId, TransferError, TransferRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

/// Row of the accounts CSV: `account,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub account: String,
    pub balance: String,
}

/// Row of the transfers CSV: `from,to,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferCsvRecord {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// An account to open, as read from the accounts CSV
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSeed {
    pub id: AccountId,
    pub balance: Decimal,
}

fn parse_decimal(value: &str, field: &str) -> Result<Decimal, TransferError> {
    Decimal::from_str(value.trim()).map_err(|_| TransferError::ParseError {
        line: None,
        message: format!("invalid {} '{}'", field, value),
    })
}

/// Convert an accounts row into an `AccountSeed`
///
/// Only parsing happens here; the opening balance sign and id uniqueness are
/// checked when the account is created.
pub fn convert_account_record(record: AccountCsvRecord) -> Result<AccountSeed, TransferError> {
    let balance = parse_decimal(&record.balance, "balance")?;

    Ok(AccountSeed {
        id: record.account.trim().to_string(),
        balance,
    })
}

/// Convert a transfers row into a validated `TransferRequest`
pub fn convert_transfer_record(
    record: TransferCsvRecord,
) -> Result<TransferRequest, TransferError> {
    let amount = parse_decimal(&record.amount, "amount")?;

    TransferRequest::new(record.from.trim(), record.to.trim(), amount)
}

/// Write account balances as `account,balance`, sorted by account id
pub fn write_balances_csv(
    accounts: &[Arc<Account>],
    output: &mut dyn Write,
) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted: Vec<&Arc<Account>> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    for account in sorted {
        writer.write_record([account.id().to_string(), format!("{:.4}", account.balance())])?;
    }

    writer.flush()?;

    Ok(())
}
