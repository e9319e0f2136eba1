//! Mock driver for unit testing page objects.
//!
//! Records every call in order and answers from scripted state, so tests can
//! assert on call order and error propagation without a device.

use crate::dialect::Dialect;
use crate::driver::{AppId, AutomationDriver, ElementRef};
use crate::result::{PageError, PageResult};
use crate::selector::Selector;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call observed by [`MockDriver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `set_wait_timeout`
    SetWaitTimeout(Duration),
    /// `start_app`
    StartApp(AppId),
    /// `stop_app`
    StopApp(AppId),
    /// `find_elements`
    FindElements(Selector),
}

impl Call {
    /// Kind of this call, for matching scripted failures
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        match self {
            Self::SetWaitTimeout(_) => CallKind::SetWaitTimeout,
            Self::StartApp(_) => CallKind::StartApp,
            Self::StopApp(_) => CallKind::StopApp,
            Self::FindElements(_) => CallKind::FindElements,
        }
    }
}

/// Call kinds that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `set_wait_timeout`
    SetWaitTimeout,
    /// `start_app`
    StartApp,
    /// `stop_app`
    StopApp,
    /// `find_elements`
    FindElements,
}

impl CallKind {
    /// Command name used in the produced [`PageError::Driver`]
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::SetWaitTimeout => "set_wait_timeout",
            Self::StartApp => "start_app",
            Self::StopApp => "stop_app",
            Self::FindElements => "find_elements",
        }
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    dialect: Dialect,
    present: HashSet<Selector>,
    failures: HashMap<CallKind, String>,
    history: Mutex<Vec<Call>>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a different dialect
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Make a selector resolve to one element
    #[must_use]
    pub fn with_element(mut self, selector: Selector) -> Self {
        let _ = self.present.insert(selector);
        self
    }

    /// Make every call of `kind` fail with `message`
    #[must_use]
    pub fn failing(mut self, kind: CallKind, message: impl Into<String>) -> Self {
        let _ = self.failures.insert(kind, message.into());
        self
    }

    /// Snapshot of the call history
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.history().clone()
    }

    /// Number of calls of `kind`
    #[must_use]
    pub fn count(&self, kind: CallKind) -> usize {
        self.history().iter().filter(|c| c.kind() == kind).count()
    }

    /// Check if a call of `kind` was made
    #[must_use]
    pub fn was_called(&self, kind: CallKind) -> bool {
        self.count(kind) > 0
    }

    fn history(&self) -> MutexGuard<'_, Vec<Call>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) -> PageResult<()> {
        let kind = call.kind();
        self.history().push(call);
        match self.failures.get(&kind) {
            Some(message) => Err(PageError::driver(kind.command(), message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AutomationDriver for MockDriver {
    async fn set_wait_timeout(&self, timeout: Duration) -> PageResult<()> {
        self.record(Call::SetWaitTimeout(timeout))
    }

    async fn start_app(&self, app: &AppId) -> PageResult<()> {
        self.record(Call::StartApp(app.clone()))
    }

    async fn stop_app(&self, app: &AppId) -> PageResult<()> {
        self.record(Call::StopApp(app.clone()))
    }

    async fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementRef>> {
        self.record(Call::FindElements(selector.clone()))?;
        if self.present.contains(selector) {
            Ok(vec![ElementRef::new("mock-element-1")])
        } else {
            Ok(Vec::new())
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}
