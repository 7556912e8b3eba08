use crate::core::TransferConfig;
use crate::pipeline::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Open accounts and execute transfers between them concurrently
#[derive(Parser, Debug)]
#[command(name = "account-transfers")]
#[command(about = "Open accounts and execute transfers between them concurrently", long_about = None)]
pub struct CliArgs {
    /// CSV file with the accounts to open (`account,balance`)
    #[arg(value_name = "ACCOUNTS", help = "Path to the accounts CSV file")]
    pub accounts_file: PathBuf,

    /// CSV file with the transfers to execute (`from,to,amount`)
    #[arg(value_name = "TRANSFERS", help = "Path to the transfers CSV file")]
    pub transfers_file: PathBuf,

    /// Maximum number of transfers in flight
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of transfers executing concurrently (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Lock attempts per transfer before it times out
    #[arg(
        long = "max-attempts",
        value_name = "COUNT",
        help = "Lock attempts per transfer before giving up (default: 10)"
    )]
    pub max_attempts: Option<u32>,

    /// Upper bound of the random backoff between attempts, in milliseconds
    #[arg(
        long = "max-backoff-ms",
        value_name = "MILLIS",
        help = "Exclusive upper bound of the random backoff between attempts (default: 1000)"
    )]
    pub max_backoff_ms: Option<u64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long = "log-level", value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Create a PipelineConfig from CLI arguments
    ///
    /// Values not given on the command line, and zero values, fall back to the
    /// defaults.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let default = PipelineConfig::default();

        let transfer = if self.max_attempts.is_some() || self.max_backoff_ms.is_some() {
            TransferConfig::new(
                self.max_attempts.unwrap_or(default.transfer.max_attempts),
                self.max_backoff_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default.transfer.max_backoff),
            )
        } else {
            default.transfer.clone()
        };

        PipelineConfig::new(
            self.max_concurrent.unwrap_or(default.max_concurrent),
            transfer,
        )
    }
}
