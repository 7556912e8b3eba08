//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV row formats, row conversion and balance output
//! - `reader` - File readers yielding one result per CSV row

pub mod csv_format;
pub mod reader;

pub use csv_format::{write_balances_csv, AccountCsvRecord, AccountSeed, TransferCsvRecord};
pub use reader::{read_accounts, read_transfers};
