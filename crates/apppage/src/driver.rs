//! AutomationDriver - Abstract Mobile Automation Trait
//!
//! Page objects talk to the device through this trait. The session behind it
//! is established and torn down by the harness; page objects only borrow it.
//!
//! # Implementations
//!
//! - [`RemoteDriver`](crate::RemoteDriver) - Appium server over HTTP, either dialect
//! - [`MockDriver`](crate::MockDriver) - records calls for unit tests

use crate::dialect::Dialect;
use crate::result::PageResult;
use crate::selector::Selector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// W3C element reference key
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// JSON Wire element reference key
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Platform package identifier of an app (e.g. `com.google.android.calculator`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Wrap a package identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque element reference returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    /// Create an element reference
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Server-side element id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Extract a reference from a JSON element object of either dialect
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        value
            .get(W3C_ELEMENT_KEY)
            .or_else(|| value.get(LEGACY_ELEMENT_KEY))
            .and_then(serde_json::Value::as_str)
            .map(Self::new)
    }
}

/// Abstract driver for mobile app automation
///
/// One capability set regardless of the server's command vocabulary; the
/// [`Dialect`] only changes how an implementation encodes each call.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    /// Set the implicit element wait of the session
    async fn set_wait_timeout(&self, timeout: Duration) -> PageResult<()>;

    /// Launch the app, or bring it to the foreground if already running
    async fn start_app(&self, app: &AppId) -> PageResult<()>;

    /// Terminate the app
    async fn stop_app(&self, app: &AppId) -> PageResult<()>;

    /// Query all elements matching a selector
    async fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementRef>>;

    /// Command vocabulary this driver speaks
    fn dialect(&self) -> Dialect;
}

#[async_trait]
impl<D: AutomationDriver + ?Sized> AutomationDriver for &D {
    async fn set_wait_timeout(&self, timeout: Duration) -> PageResult<()> {
        (**self).set_wait_timeout(timeout).await
    }

    async fn start_app(&self, app: &AppId) -> PageResult<()> {
        (**self).start_app(app).await
    }

    async fn stop_app(&self, app: &AppId) -> PageResult<()> {
        (**self).stop_app(app).await
    }

    async fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementRef>> {
        (**self).find_elements(selector).await
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

#[async_trait]
impl<D: AutomationDriver + ?Sized> AutomationDriver for Arc<D> {
    async fn set_wait_timeout(&self, timeout: Duration) -> PageResult<()> {
        (**self).set_wait_timeout(timeout).await
    }

    async fn start_app(&self, app: &AppId) -> PageResult<()> {
        (**self).start_app(app).await
    }

    async fn stop_app(&self, app: &AppId) -> PageResult<()> {
        (**self).stop_app(app).await
    }

    async fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementRef>> {
        (**self).find_elements(selector).await
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

/// Lazy element query bound to a driver
///
/// Nothing is sent until a check such as [`Element::is_existing`] runs.
pub struct Element<'d, D: ?Sized> {
    driver: &'d D,
    selector: Selector,
}

impl<D: ?Sized> fmt::Debug for Element<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<'d, D: AutomationDriver + ?Sized> Element<'d, D> {
    /// Bind a selector to a driver
    pub fn new(driver: &'d D, selector: Selector) -> Self {
        Self { driver, selector }
    }

    /// Selector this element resolves through
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// True when at least one element matches right now
    ///
    /// Absence is `Ok(false)`; only driver failures are errors.
    pub async fn is_existing(&self) -> PageResult<bool> {
        let found = self.driver.find_elements(&self.selector).await?;
        Ok(!found.is_empty())
    }
}

/// Shorthand for [`Element::new`]
pub fn element<D: AutomationDriver + ?Sized>(driver: &D, selector: Selector) -> Element<'_, D> {
    Element::new(driver, selector)
}
