//! CSV file readers for account seeds and transfer requests
//!
//! Both readers share the same behaviour:
//!
//! - Fatal errors (file not found, unreadable file) are returned as `Err`
//! - Each data row yields its own `Result`, so one malformed row doesn't stop
//!   the rest of the file from being used
//! - Row errors carry the 1-based line number (the header is line 1)

use super::csv_format::{
    convert_account_record, convert_transfer_record, AccountCsvRecord, AccountSeed,
    TransferCsvRecord,
};
use crate::types::{TransferError, TransferRequest};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read every row of an accounts CSV (`account,balance`)
pub fn read_accounts(path: &Path) -> Result<Vec<Result<AccountSeed, TransferError>>, TransferError> {
    let file = open(path)?;
    Ok(read_rows(file, convert_account_record))
}

/// Read every row of a transfers CSV (`from,to,amount`)
pub fn read_transfers(
    path: &Path,
) -> Result<Vec<Result<TransferRequest, TransferError>>, TransferError> {
    let file = open(path)?;
    Ok(read_rows(file, convert_transfer_record))
}

fn open(path: &Path) -> Result<File, TransferError> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TransferError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => TransferError::IoError {
            message: format!("failed to open file '{}': {}", path.display(), e),
        },
    })
}

/// Deserialize and convert each row, attaching line numbers to row errors
pub(crate) fn read_rows<R, C, T>(
    input: R,
    convert: fn(C) -> Result<T, TransferError>,
) -> Vec<Result<T, TransferError>>
where
    R: Read,
    C: DeserializeOwned,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .buffer_capacity(8 * 1024)
        .from_reader(input);

    reader
        .deserialize::<C>()
        .enumerate()
        .map(|(index, row)| {
            let line = index as u64 + 2;
            match row {
                Ok(record) => convert(record).map_err(|e| with_line(e, line)),
                Err(e) => Err(with_line(e.into(), line)),
            }
        })
        .collect()
}

fn with_line(error: TransferError, line: u64) -> TransferError {
    match error {
        TransferError::ParseError { message, .. } => TransferError::ParseError {
            line: Some(line),
            message,
        },
        TransferError::InvalidRequest { message } => TransferError::InvalidRequest {
            message: format!("line {}: {}", line, message),
        },
        other => other,
    }
}
