//! Account Transfers CLI
//!
//! Opens the accounts listed in one CSV file, executes the transfers listed in
//! another, and prints the final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv transfers.csv > balances.csv
//! cargo run -- --max-concurrent 8 --max-attempts 10 --max-backoff-ms 1000 accounts.csv transfers.csv
//! RUST_LOG=debug cargo run -- accounts.csv transfers.csv
//! ```
//!
//! Logs are written to stderr, balances to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success (individual rows or transfers may still have failed; see the logs)
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use account_transfers::{cli, logging, pipeline};
use std::process;

fn main() {
    let args = cli::parse_args();

    logging::init_logging(&args.log_level, args.json_logs);

    let config = args.to_pipeline_config();

    let mut output = std::io::stdout();
    if let Err(e) = pipeline::process(
        &args.accounts_file,
        &args.transfers_file,
        &config,
        &mut output,
    ) {
        tracing::error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
