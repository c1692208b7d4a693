//! Deferred-value demonstration driver
//!
//! Entry point for `future-demo`. Parses CLI arguments and delegates to the
//! Runtime for execution.

use clap::Parser;
use future_cli::{scenarios, Cli, Runtime};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if cli.list {
        for scenario in scenarios::SCENARIOS {
            println!("{:<16} {}", scenario.name, scenario.description);
        }
        println!(
            "{:<16} {}",
            scenarios::DEMO,
            "every scenario above on one event loop"
        );
        return ExitCode::SUCCESS;
    }

    match Runtime::new().run_scenario(&cli.scenario) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
