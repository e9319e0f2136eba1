//! Page Object Model support for mobile apps.
//!
//! A page object names one app-level concern (here: the app itself) and
//! bundles the identifiers and lifecycle actions tests need for it. The
//! driver session is injected and only borrowed: whoever created the session
//! tears it down.

use crate::config::PageConfig;
use crate::driver::{element, AppId, AutomationDriver};
use crate::result::{PageError, PageResult};
use crate::selector::Selector;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Trait for page objects with an open/close lifecycle
///
/// # Example
///
/// ```ignore
/// let driver = RemoteDriver::connect(&server, &capabilities).await?;
/// let page = AppPage::calculator(&driver);
///
/// page.open().await?;
/// // interact with the calculator...
/// page.close().await?;
///
/// driver.quit().await?;
/// ```
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Name for logging/debugging
    fn name(&self) -> &str;

    /// Bring the page up and wait until it can be queried
    async fn open(&self) -> PageResult<()>;

    /// Tear the page down
    async fn close(&self) -> PageResult<()>;
}

/// Page object for a whole app: start it, wait for its root view, stop it
#[derive(Debug)]
pub struct AppPage<'d, D: ?Sized> {
    driver: &'d D,
    config: PageConfig,
    name: String,
}

impl<'d, D: AutomationDriver + ?Sized> AppPage<'d, D> {
    /// Create a page object over a borrowed driver session
    pub fn new(driver: &'d D, config: PageConfig) -> Self {
        let name = config.app_id.to_string();
        Self {
            driver,
            config,
            name,
        }
    }

    /// The Google calculator with its default identifiers
    pub fn calculator(driver: &'d D) -> Self {
        Self::new(driver, PageConfig::calculator()).with_name("calculator")
    }

    /// Override the name used in logs
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Page configuration
    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// App this page controls
    #[must_use]
    pub const fn app_id(&self) -> &AppId {
        &self.config.app_id
    }

    /// Element whose presence marks the app as ready
    #[must_use]
    pub const fn ready_selector(&self) -> &Selector {
        &self.config.ready_selector
    }

    /// Set the implicit wait, start the app, then query the ready element
    ///
    /// The existence result does not affect the outcome unless
    /// [`PageConfig::require_ready_element`] is set; driver errors from any
    /// step propagate unchanged and stop the sequence. Nothing is cleaned up
    /// on failure.
    #[instrument(skip(self), fields(page = %self.name, dialect = %self.driver.dialect()))]
    pub async fn open(&self) -> PageResult<()> {
        self.driver
            .set_wait_timeout(self.config.wait_timeout())
            .await?;
        self.driver.start_app(&self.config.app_id).await?;

        let ready = element(self.driver, self.config.ready_selector.clone());
        let exists = ready.is_existing().await?;
        debug!(selector = %ready.selector(), exists, "ready element checked");

        if self.config.require_ready_element && !exists {
            return Err(PageError::ElementNotFound {
                selector: ready.selector().to_string(),
            });
        }

        info!(app = %self.config.app_id, "page opened");
        Ok(())
    }

    /// Terminate the app
    #[instrument(skip(self), fields(page = %self.name))]
    pub async fn close(&self) -> PageResult<()> {
        self.driver.stop_app(&self.config.app_id).await?;
        info!(app = %self.config.app_id, "page closed");
        Ok(())
    }
}

#[async_trait]
impl<D: AutomationDriver + ?Sized> PageObject for AppPage<'_, D> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> PageResult<()> {
        AppPage::open(self).await
    }

    async fn close(&self) -> PageResult<()> {
        AppPage::close(self).await
    }
}
