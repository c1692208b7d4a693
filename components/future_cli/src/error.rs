//! Error types for the CLI

use core_types::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// No scenario with the requested name
    #[error("unknown scenario '{0}' (use --list to see available scenarios)")]
    UnknownScenario(String),

    /// A host task failed while the event loop was running
    #[error("runtime error: {0}")]
    Runtime(#[from] JsError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
