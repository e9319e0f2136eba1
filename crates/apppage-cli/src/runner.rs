//! Session harness around the app page object
//!
//! The harness owns the session: it creates (or attaches to) it, hands a
//! borrow to the page object, and deletes it afterwards when it created it.

use crate::commands::Commands;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use apppage::{AppPage, AutomationDriver, PageResult, RemoteDriver};
use tracing::warn;

/// Page lifecycle action requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `open` only
    Open,
    /// `close` only
    Close,
    /// `open` then `close`
    Smoke,
}

impl Action {
    /// Action for a subcommand, `None` for commands that need no session
    #[must_use]
    pub const fn from_command(command: Commands) -> Option<Self> {
        match command {
            Commands::Open => Some(Self::Open),
            Commands::Close => Some(Self::Close),
            Commands::Smoke => Some(Self::Smoke),
            Commands::Config => None,
        }
    }
}

/// Runs page actions against a remote session
#[derive(Debug)]
pub struct SessionRunner {
    config: CliConfig,
    reporter: Reporter,
}

impl SessionRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter = Reporter::new(config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Establish the session, run `action`, then release the session
    ///
    /// An owned session is deleted even when the action failed; the action's
    /// error is reported first.
    pub async fn run(&self, action: Action) -> CliResult<()> {
        let suite = &self.config.suite;
        let driver = match &suite.session_id {
            Some(id) => RemoteDriver::attach(&suite.server, id.clone())?,
            None => RemoteDriver::connect(&suite.server, &suite.capabilities).await?,
        };
        self.reporter.info(&format!(
            "session {} on {} ({})",
            driver.session_id(),
            suite.server.url,
            driver.dialect()
        ));

        let outcome = self.drive(&driver, action).await;
        let teardown = driver.quit().await;
        if let (Err(_), Err(e)) = (&outcome, &teardown) {
            warn!(error = %e, "session teardown failed after action error");
        }
        outcome?;
        teardown?;
        Ok(())
    }

    /// Run `action` on an established session
    pub async fn drive<D: AutomationDriver + ?Sized>(
        &self,
        driver: &D,
        action: Action,
    ) -> PageResult<()> {
        let page = AppPage::new(driver, self.config.suite.page.clone());
        let app = page.app_id().clone();

        if matches!(action, Action::Open | Action::Smoke) {
            page.open().await?;
            self.reporter.success(&format!("opened {app}"));
        }
        if matches!(action, Action::Close | Action::Smoke) {
            page.close().await?;
            self.reporter.success(&format!("closed {app}"));
        }
        Ok(())
    }
}

/// Resolved configuration rendered as YAML
pub fn render_config(config: &CliConfig) -> CliResult<String> {
    Ok(config.suite.to_yaml()?)
}
