//! CLI command definitions using clap

use apppage::Dialect;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// apppage: open and close mobile apps through page objects
#[derive(Parser, Debug)]
#[command(name = "apppage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Session and server options
    #[command(flatten)]
    pub session: SessionArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options that pick the server and session
#[derive(Args, Debug, Default, Clone)]
pub struct SessionArgs {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Appium server URL (overrides config and APPPAGE_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Driver command dialect (overrides config and APPPAGE_DIALECT)
    #[arg(long, global = true)]
    pub dialect: Option<DialectArg>,

    /// Attach to an existing session instead of creating one
    #[arg(long, global = true)]
    pub session_id: Option<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Set the wait timeout, start the app and check its ready element
    Open,

    /// Terminate the app
    Close,

    /// Open then close the app
    Smoke,

    /// Print the resolved configuration as YAML
    Config,
}

/// Dialect argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    /// JSON Wire command names (Appium 1)
    Legacy,
    /// W3C commands with `mobile:` extensions (Appium 2)
    W3c,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Legacy => Self::Legacy,
            DialectArg::W3c => Self::W3c,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_smoke_with_globals() {
        let cli = Cli::try_parse_from([
            "apppage",
            "smoke",
            "--server-url",
            "http://farm:4723",
            "--dialect",
            "legacy",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.command, Commands::Smoke);
        assert_eq!(cli.session.server_url.as_deref(), Some("http://farm:4723"));
        assert_eq!(cli.session.dialect, Some(DialectArg::Legacy));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_config_file_before_subcommand() {
        let cli = Cli::try_parse_from(["apppage", "-c", "suite.yaml", "open"]).unwrap();
        assert_eq!(cli.command, Commands::Open);
        assert_eq!(cli.session.config, Some(PathBuf::from("suite.yaml")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["apppage"]).is_err());
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        assert!(Cli::try_parse_from(["apppage", "open", "--dialect", "selenium"]).is_err());
    }

    #[test]
    fn test_dialect_conversion() {
        assert_eq!(Dialect::from(DialectArg::Legacy), Dialect::Legacy);
        assert_eq!(Dialect::from(DialectArg::W3c), Dialect::W3c);
    }
}
