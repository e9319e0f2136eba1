//! apppage CLI library
//!
//! Harness around the `apppage` page objects: resolves configuration,
//! establishes the session and runs `open` / `close` against it.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, Commands, DialectArg, SessionArgs};
pub use config::{CliConfig, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
pub use runner::{render_config, Action, SessionRunner};
