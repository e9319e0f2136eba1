//! Configuration for page objects and the remote session.
//!
//! Every section is optional in YAML; missing values fall back to the
//! calculator defaults.

use crate::dialect::Dialect;
use crate::driver::AppId;
use crate::result::{PageError, PageResult};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

/// Package of the Google calculator app
pub const CALCULATOR_APP_ID: &str = "com.google.android.calculator";

macro_rules! calculator_main_view {
    () => {
        "com.google.android.calculator:id/main_calculator"
    };
}

/// Resource id of the Google calculator root view
pub const CALCULATOR_READY_ID: &str = calculator_main_view!();

/// Root view of the Google calculator, present once the app is interactive
pub const CALCULATOR_READY_SELECTOR: &str = concat!("id=", calculator_main_view!());

/// Default implicit wait applied by `open` (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default Appium server address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";

/// Default HTTP timeout per driver command (60 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Environment variable overriding [`ServerConfig::url`]
pub const ENV_SERVER_URL: &str = "APPPAGE_SERVER_URL";
/// Environment variable overriding [`ServerConfig::dialect`]
pub const ENV_DIALECT: &str = "APPPAGE_DIALECT";
/// Environment variable selecting an existing session to attach to
pub const ENV_SESSION_ID: &str = "APPPAGE_SESSION_ID";

/// What a page object opens and waits for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Package identifier of the app under test
    pub app_id: AppId,
    /// Element queried once the app is started
    pub ready_selector: Selector,
    /// Implicit wait applied to the session before starting the app
    pub wait_timeout_ms: u64,
    /// Fail `open` when the ready element is absent instead of ignoring it
    pub require_ready_element: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::calculator()
    }
}

impl PageConfig {
    /// Configuration for an arbitrary app
    #[must_use]
    pub fn new(app_id: impl Into<String>, ready_selector: Selector) -> Self {
        Self {
            app_id: AppId::new(app_id),
            ready_selector,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            require_ready_element: false,
        }
    }

    /// The Google calculator
    #[must_use]
    pub fn calculator() -> Self {
        Self::new(CALCULATOR_APP_ID, Selector::id(CALCULATOR_READY_ID))
    }

    /// Set the implicit wait in milliseconds
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait_timeout_ms = timeout_ms;
        self
    }

    /// Turn an absent ready element into an error
    #[must_use]
    pub const fn require_ready_element(mut self, required: bool) -> Self {
        self.require_ready_element = required;
        self
    }

    /// Implicit wait as Duration
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

/// Where the Appium server lives and which vocabulary it speaks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the server (no trailing `/session`)
    pub url: String,
    /// Command vocabulary
    pub dialect: Dialect,
    /// HTTP timeout per command
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            dialect: Dialect::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    /// Server at `url` with default settings
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the dialect
    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the per-command HTTP timeout in milliseconds
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Per-command HTTP timeout as Duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Whole configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Appium server
    pub server: ServerConfig,
    /// Capabilities sent when creating a session
    pub capabilities: Map<String, Value>,
    /// Page object settings
    pub page: PageConfig,
    /// Attach to this session instead of creating one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            capabilities: calculator_capabilities(),
            page: PageConfig::default(),
            session_id: None,
        }
    }
}

impl SuiteConfig {
    /// Parse from YAML text
    ///
    /// Only the syntax is checked. Later layers (env, flags) may still
    /// replace any value, so call [`SuiteConfig::validate`] once they are
    /// applied.
    pub fn from_yaml_str(yaml: &str) -> PageResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file, unvalidated like [`SuiteConfig::from_yaml_str`]
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> PageResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `APPPAGE_*` overrides from the process environment
    pub fn apply_env(&mut self) -> PageResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `APPPAGE_*` overrides from an arbitrary lookup
    ///
    /// Fails only on values that cannot be parsed; see [`SuiteConfig::validate`].
    pub fn apply_env_with<F>(&mut self, lookup: F) -> PageResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.is_empty()) {
            self.server.url = url;
        }
        if let Some(dialect) = lookup(ENV_DIALECT).filter(|v| !v.is_empty()) {
            self.server.dialect = dialect.parse()?;
        }
        if let Some(session) = lookup(ENV_SESSION_ID).filter(|v| !v.is_empty()) {
            self.session_id = Some(session);
        }
        Ok(())
    }

    /// Reject values no server would accept
    pub fn validate(&self) -> PageResult<()> {
        let url = self.server.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PageError::config(format!(
                "server url `{url}` must start with http:// or https://"
            )));
        }
        if self.page.app_id.as_str().is_empty() {
            return Err(PageError::config("page.app_id must not be empty"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(PageError::config("server.request_timeout_ms must be > 0"));
        }
        if self.server.dialect == Dialect::Legacy {
            let launched = capability_app(&self.capabilities);
            if launched.as_ref() != Some(&self.page.app_id) {
                return Err(PageError::config(format!(
                    "legacy dialect starts the session app ({}), so page.app_id `{}` must \
                     match capabilities appium:appPackage",
                    launched.map_or_else(|| "none".to_string(), |app| app.to_string()),
                    self.page.app_id
                )));
            }
        }
        Ok(())
    }
}

/// App package a session launches, from `appium:appPackage` or `appPackage`
#[must_use]
pub fn capability_app(capabilities: &Map<String, Value>) -> Option<AppId> {
    capabilities
        .get("appium:appPackage")
        .or_else(|| capabilities.get("appPackage"))
        .and_then(Value::as_str)
        .filter(|package| !package.is_empty())
        .map(AppId::from)
}

/// Capabilities for the Google calculator on an Android UiAutomator2 session
#[must_use]
pub fn calculator_capabilities() -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("platformName".into(), Value::from("Android"));
    caps.insert("appium:automationName".into(), Value::from("UiAutomator2"));
    caps.insert("appium:appPackage".into(), Value::from(CALCULATOR_APP_ID));
    caps.insert(
        "appium:appActivity".into(),
        Value::from("com.android.calculator2.Calculator"),
    );
    caps
}
