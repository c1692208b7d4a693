//! Deferred-value demonstration driver
//!
//! Provides the Runtime struct and the scenarios replayed by `future-demo`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod globals;
pub mod runtime;
pub mod scenarios;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use globals::GlobalScope;
pub use runtime::Runtime;
