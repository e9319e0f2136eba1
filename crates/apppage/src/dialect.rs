//! Driver command vocabularies.
//!
//! Appium servers speak one of two dialects. Legacy (JSON Wire, Appium 1)
//! exposes dedicated `implicit_wait` and `appium/app/*` endpoints, while W3C
//! (Appium 2) folds timeouts into one endpoint and routes app lifecycle
//! through `mobile:` execute commands. Page objects only see the capability;
//! the dialect picks the wire command.

use crate::driver::AppId;
use crate::result::PageError;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Driver command vocabulary version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// JSON Wire protocol command names (Appium 1)
    #[serde(alias = "jsonwp")]
    Legacy,
    /// W3C WebDriver with `mobile:` extensions (Appium 2)
    #[default]
    #[serde(alias = "appium2")]
    W3c,
}

impl Dialect {
    /// Stable name used in configuration files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::W3c => "w3c",
        }
    }

    /// Build the wire command for a capability
    #[must_use]
    pub fn command(self, command: &DriverCommand) -> WireCommand {
        match (self, command) {
            (Self::Legacy, DriverCommand::SetWaitTimeout(timeout)) => WireCommand::post(
                "/timeouts/implicit_wait",
                json!({ "ms": millis(*timeout) }),
            ),
            (Self::W3c, DriverCommand::SetWaitTimeout(timeout)) => {
                WireCommand::post("/timeouts", json!({ "implicit": millis(*timeout) }))
            }
            (Self::Legacy, DriverCommand::StartApp(_)) => {
                WireCommand::post("/appium/app/launch", json!({}))
            }
            (Self::W3c, DriverCommand::StartApp(app)) => mobile_command("mobile: activateApp", app),
            (Self::Legacy, DriverCommand::StopApp(_)) => {
                WireCommand::post("/appium/app/close", json!({}))
            }
            (Self::W3c, DriverCommand::StopApp(app)) => mobile_command("mobile: terminateApp", app),
            (_, DriverCommand::FindElements(selector)) => {
                WireCommand::post("/elements", selector.to_locator())
            }
        }
    }

    /// Body for `POST /session`
    #[must_use]
    pub fn new_session_body(self, capabilities: &serde_json::Map<String, Value>) -> Value {
        match self {
            Self::Legacy => json!({ "desiredCapabilities": capabilities }),
            Self::W3c => json!({
                "capabilities": {
                    "alwaysMatch": capabilities,
                    "firstMatch": [{}],
                }
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "jsonwp" => Ok(Self::Legacy),
            "w3c" | "appium2" => Ok(Self::W3c),
            other => Err(PageError::config(format!(
                "unknown dialect `{other}` (expected `legacy` or `w3c`)"
            ))),
        }
    }
}

/// A driver capability, independent of dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    /// Configure the implicit element wait
    SetWaitTimeout(Duration),
    /// Launch or bring the app to the foreground
    StartApp(AppId),
    /// Terminate the app
    StopApp(AppId),
    /// Query elements matching a selector
    FindElements(Selector),
}

impl DriverCommand {
    /// Short name for logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetWaitTimeout(_) => "set_wait_timeout",
            Self::StartApp(_) => "start_app",
            Self::StopApp(_) => "stop_app",
            Self::FindElements(_) => "find_elements",
        }
    }
}

/// HTTP method of a wire command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST
    Post,
    /// DELETE
    Delete,
}

/// A session-relative HTTP command
#[derive(Debug, Clone, PartialEq)]
pub struct WireCommand {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below `/session/{id}`
    pub path: String,
    /// JSON body (ignored for DELETE)
    pub body: Value,
}

impl WireCommand {
    fn post(path: &str, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_string(),
            body,
        }
    }

    /// `DELETE /session/{id}`
    #[must_use]
    pub fn delete_session() -> Self {
        Self {
            method: HttpMethod::Delete,
            path: String::new(),
            body: Value::Null,
        }
    }
}

fn mobile_command(script: &str, app: &AppId) -> WireCommand {
    WireCommand::post(
        "/execute/sync",
        json!({
            "script": script,
            "args": [{ "appId": app.as_str() }],
        }),
    )
}

fn millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn calculator() -> AppId {
        AppId::new("com.google.android.calculator")
    }

    mod legacy_tests {
        use super::*;

        #[test]
        fn test_set_wait_timeout() {
            let cmd = Dialect::Legacy
                .command(&DriverCommand::SetWaitTimeout(Duration::from_secs(10)));
            assert_eq!(cmd.method, HttpMethod::Post);
            assert_eq!(cmd.path, "/timeouts/implicit_wait");
            assert_eq!(cmd.body, json!({ "ms": 10000 }));
        }

        #[test]
        fn test_app_lifecycle() {
            let start = Dialect::Legacy.command(&DriverCommand::StartApp(calculator()));
            assert_eq!(start.path, "/appium/app/launch");
            let stop = Dialect::Legacy.command(&DriverCommand::StopApp(calculator()));
            assert_eq!(stop.path, "/appium/app/close");
        }

        #[test]
        fn test_new_session_body() {
            let mut caps = serde_json::Map::new();
            caps.insert("platformName".into(), json!("Android"));
            let body = Dialect::Legacy.new_session_body(&caps);
            assert_eq!(body["desiredCapabilities"]["platformName"], "Android");
        }
    }

    mod w3c_tests {
        use super::*;

        #[test]
        fn test_set_wait_timeout() {
            let cmd =
                Dialect::W3c.command(&DriverCommand::SetWaitTimeout(Duration::from_millis(2500)));
            assert_eq!(cmd.path, "/timeouts");
            assert_eq!(cmd.body, json!({ "implicit": 2500 }));
        }

        #[test]
        fn test_activate_and_terminate() {
            let start = Dialect::W3c.command(&DriverCommand::StartApp(calculator()));
            assert_eq!(start.path, "/execute/sync");
            assert_eq!(start.body["script"], "mobile: activateApp");
            assert_eq!(start.body["args"][0]["appId"], "com.google.android.calculator");

            let stop = Dialect::W3c.command(&DriverCommand::StopApp(calculator()));
            assert_eq!(stop.body["script"], "mobile: terminateApp");
        }

        #[test]
        fn test_new_session_body() {
            let caps = serde_json::Map::new();
            let body = Dialect::W3c.new_session_body(&caps);
            assert!(body["capabilities"]["alwaysMatch"].is_object());
            assert_eq!(body["capabilities"]["firstMatch"], json!([{}]));
        }
    }

    #[test]
    fn test_find_elements_is_shared() {
        let cmd = DriverCommand::FindElements(Selector::id("pkg:id/main"));
        assert_eq!(Dialect::Legacy.command(&cmd), Dialect::W3c.command(&cmd));
        assert_eq!(Dialect::W3c.command(&cmd).path, "/elements");
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("legacy".parse::<Dialect>().unwrap(), Dialect::Legacy);
        assert_eq!("JSONWP".parse::<Dialect>().unwrap(), Dialect::Legacy);
        assert_eq!(" w3c ".parse::<Dialect>().unwrap(), Dialect::W3c);
        assert_eq!("appium2".parse::<Dialect>().unwrap(), Dialect::W3c);
        assert!("selenium3".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_serde() {
        assert_eq!(serde_json::to_string(&Dialect::Legacy).unwrap(), "\"legacy\"");
        assert_eq!(
            serde_json::from_str::<Dialect>("\"w3c\"").unwrap(),
            Dialect::W3c
        );
    }

    #[test]
    fn test_command_names() {
        assert_eq!(
            DriverCommand::StartApp(calculator()).name(),
            "start_app"
        );
        assert_eq!(
            DriverCommand::FindElements(Selector::id("x")).name(),
            "find_elements"
        );
    }
}
