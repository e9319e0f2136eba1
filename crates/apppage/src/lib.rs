//! apppage: page objects for mobile app UI tests
//!
//! A page object starts the app under test, waits for its root view and
//! stops it again, over any [`AutomationDriver`]. The driver hides which
//! command vocabulary the Appium server speaks ([`Dialect::Legacy`] or
//! [`Dialect::W3c`]).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ AppPage      │────►│ AutomationDriver  │────►│ RemoteDriver     │──► Appium (HTTP)
//! │ open / close │     │ (trait)           │     │ Dialect commands │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//!                                │
//!                                └──────────────►  MockDriver (tests)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use apppage::prelude::*;
//!
//! let mut config = SuiteConfig::from_file("apppage.yaml")?;
//! config.apply_env()?;
//! config.validate()?;
//! let driver = RemoteDriver::connect(&config.server, &config.capabilities).await?;
//!
//! let page = AppPage::new(&driver, config.page.clone());
//! page.open().await?;
//! page.close().await?;
//!
//! driver.quit().await?;
//! ```

#![warn(missing_docs)]

mod config;
mod dialect;
mod driver;
mod mock;
mod page_object;
mod remote;
mod result;
mod selector;

pub use config::{
    calculator_capabilities, capability_app, PageConfig, ServerConfig, SuiteConfig,
    CALCULATOR_APP_ID, CALCULATOR_READY_ID, CALCULATOR_READY_SELECTOR,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SERVER_URL, DEFAULT_WAIT_TIMEOUT_MS, ENV_DIALECT,
    ENV_SERVER_URL, ENV_SESSION_ID,
};
pub use dialect::{Dialect, DriverCommand, HttpMethod, WireCommand};
pub use driver::{
    element, AppId, AutomationDriver, Element, ElementRef, LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY,
};
pub use mock::{Call, CallKind, MockDriver};
pub use page_object::{AppPage, PageObject};
pub use remote::{decode_envelope, legacy_error_name, RemoteDriver};
pub use result::{PageError, PageResult};
pub use selector::Selector;

/// Common imports for tests using apppage
pub mod prelude {
    pub use crate::{
        AppId, AppPage, AutomationDriver, Dialect, MockDriver, PageConfig, PageError,
        PageObject, PageResult, RemoteDriver, Selector, ServerConfig, SuiteConfig,
    };
}
