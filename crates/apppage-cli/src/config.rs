//! CLI configuration
//!
//! Resolution order, later wins: config file, `APPPAGE_*` environment,
//! command-line flags.

use crate::commands::{Cli, SessionArgs};
use crate::error::{CliError, CliResult};
use apppage::SuiteConfig;
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - info logs from the page object
    Verbose,
    /// Debug - every wire command
    Debug,
}

impl Verbosity {
    /// Map `-q` / `-v` counts to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default tracing filter directive for this level
    #[must_use]
    pub const fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "apppage=info,apppage_cli=info",
            Self::Debug => "apppage=debug,apppage_cli=debug",
        }
    }
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Server, capabilities and page settings
    pub suite: SuiteConfig,
}

impl CliConfig {
    /// Resolve from parsed arguments and the process environment
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    ///
    /// Layers apply in order file, env, flags with later layers winning; the
    /// merged result is validated once at the end.
    pub fn resolve<F>(cli: &Cli, env: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut suite = match &cli.session.config {
            Some(path) => SuiteConfig::from_file(path).map_err(|e| {
                CliError::config(format!("cannot load {}: {e}", path.display()))
            })?,
            None => SuiteConfig::default(),
        };
        suite.apply_env_with(env)?;
        apply_flags(&mut suite, &cli.session)?;
        suite.validate()?;

        Ok(Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            suite,
        })
    }
}

fn apply_flags(suite: &mut SuiteConfig, args: &SessionArgs) -> CliResult<()> {
    if let Some(url) = &args.server_url {
        suite.server.url.clone_from(url);
    }
    if let Some(dialect) = args.dialect {
        suite.server.dialect = dialect.into();
    }
    if let Some(session) = &args.session_id {
        if session.trim().is_empty() {
            return Err(CliError::invalid_argument("--session-id must not be empty"));
        }
        suite.session_id = Some(session.clone());
    }
    Ok(())
}
