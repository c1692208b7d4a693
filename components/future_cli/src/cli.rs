//! Command-line arguments

use clap::Parser;

/// Replays deferred-value demonstration scenarios.
///
/// Scenario output goes to stdout; logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "future-demo", version, about)]
pub struct Cli {
    /// Scenario to run
    #[arg(short, long, default_value = "demo")]
    pub scenario: String,

    /// List available scenarios and exit
    #[arg(short, long)]
    pub list: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
