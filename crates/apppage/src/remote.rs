//! Remote driver for Appium-style WebDriver servers.
//!
//! Speaks either [`Dialect`] over HTTP. Response envelopes of both dialects
//! are decoded here:
//!
//! ```text
//! W3C     {"value": ...}                       error: {"value": {"error": "...", "message": "..."}}
//! Legacy  {"status": 0, "sessionId": "...", "value": ...}   error: status != 0
//! ```

use crate::config::{capability_app, ServerConfig};
use crate::dialect::{Dialect, DriverCommand, HttpMethod, WireCommand};
use crate::driver::{AppId, AutomationDriver, ElementRef};
use crate::result::{PageError, PageResult};
use crate::selector::Selector;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// JSON Wire status code → W3C error name
#[must_use]
pub fn legacy_error_name(status: i64) -> &'static str {
    match status {
        6 => "invalid session id",
        7 => "no such element",
        10 => "stale element reference",
        21 => "timeout",
        _ => "unknown error",
    }
}

/// WebDriver session over HTTP
#[derive(Debug)]
pub struct RemoteDriver {
    client: reqwest::Client,
    base_url: String,
    session_id: String,
    dialect: Dialect,
    owned: bool,
    /// Package named in the session capabilities; legacy launch/close act on it
    session_app: Option<AppId>,
}

impl RemoteDriver {
    /// Create a new session with `capabilities`
    ///
    /// The returned driver owns the session; call [`RemoteDriver::quit`] to
    /// delete it.
    pub async fn connect(
        config: &ServerConfig,
        capabilities: &Map<String, Value>,
    ) -> PageResult<Self> {
        let client = build_client(config.request_timeout())?;
        let base_url = config.url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/session");
        let body = config.dialect.new_session_body(capabilities);

        debug!(%url, dialect = %config.dialect, "creating session");
        let response = client.post(&url).json(&body).send().await?;
        let envelope = decode_response(response).await?;
        let session_id = session_id_of(&envelope).ok_or_else(|| PageError::InvalidSession {
            message: "new session response carried no session id".to_string(),
        })?;

        info!(session = %session_id, dialect = %config.dialect, "session created");
        Ok(Self {
            client,
            base_url,
            session_id,
            dialect: config.dialect,
            owned: true,
            session_app: capability_app(capabilities),
        })
    }

    /// Attach to a session someone else created
    ///
    /// [`RemoteDriver::quit`] leaves attached sessions alone.
    pub fn attach(config: &ServerConfig, session_id: impl Into<String>) -> PageResult<Self> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(PageError::InvalidSession {
                message: "empty session id".to_string(),
            });
        }
        Ok(Self {
            client: build_client(config.request_timeout())?,
            base_url: config.url.trim_end_matches('/').to_string(),
            session_id,
            dialect: config.dialect,
            owned: false,
            session_app: None,
        })
    }

    /// Session id on the server
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether this driver created (and will delete) the session
    #[must_use]
    pub const fn owns_session(&self) -> bool {
        self.owned
    }

    /// Delete the session if this driver created it
    pub async fn quit(self) -> PageResult<()> {
        if !self.owned {
            debug!(session = %self.session_id, "leaving attached session open");
            return Ok(());
        }
        self.send(&WireCommand::delete_session(), "delete_session")
            .await?;
        info!(session = %self.session_id, "session deleted");
        Ok(())
    }

    /// Legacy app endpoints take no package, so refuse one the session did not launch
    fn check_session_app(&self, command: &DriverCommand, app: &AppId) -> PageResult<()> {
        match &self.session_app {
            Some(session_app) if self.dialect == Dialect::Legacy && session_app != app => {
                Err(PageError::driver(
                    command.name(),
                    format!("legacy session runs `{session_app}`, cannot target `{app}`"),
                ))
            }
            _ => Ok(()),
        }
    }

    async fn execute(&self, command: &DriverCommand) -> PageResult<Value> {
        let wire = self.dialect.command(command);
        self.send(&wire, command.name()).await
    }

    async fn send(&self, wire: &WireCommand, name: &str) -> PageResult<Value> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, wire.path);
        debug!(command = name, %url, body = %wire.body, "sending");

        let request = match wire.method {
            HttpMethod::Post => self.client.post(&url).json(&wire.body),
            HttpMethod::Delete => self.client.delete(&url),
        };
        let envelope = decode_response(request.send().await?).await?;
        Ok(envelope.get("value").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl AutomationDriver for RemoteDriver {
    async fn set_wait_timeout(&self, timeout: Duration) -> PageResult<()> {
        self.execute(&DriverCommand::SetWaitTimeout(timeout))
            .await
            .map(drop)
    }

    async fn start_app(&self, app: &AppId) -> PageResult<()> {
        let command = DriverCommand::StartApp(app.clone());
        self.check_session_app(&command, app)?;
        self.execute(&command).await.map(drop)
    }

    async fn stop_app(&self, app: &AppId) -> PageResult<()> {
        let command = DriverCommand::StopApp(app.clone());
        self.check_session_app(&command, app)?;
        self.execute(&command).await.map(drop)
    }

    async fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementRef>> {
        let value = self
            .execute(&DriverCommand::FindElements(selector.clone()))
            .await?;
        let elements = value
            .as_array()
            .map(|items| items.iter().filter_map(ElementRef::from_json).collect())
            .unwrap_or_default();
        Ok(elements)
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

fn build_client(timeout: Duration) -> PageResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn decode_response(response: reqwest::Response) -> PageResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    decode_envelope(status.as_u16(), &text)
}

/// Decode a response body of either dialect into its envelope
///
/// Returns the whole JSON object on success so callers can read both
/// `value` and the legacy top-level `sessionId`.
pub fn decode_envelope(http_status: u16, body: &str) -> PageResult<Value> {
    let envelope: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) if !(200..300).contains(&http_status) => {
                return Err(PageError::WebDriver {
                    error: "unknown error".to_string(),
                    message: format!("HTTP {http_status}: {body}"),
                });
            }
            Err(e) => return Err(e.into()),
        }
    };

    let value = envelope.get("value");
    let message = value
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if let Some(error) = value.and_then(|v| v.get("error")).and_then(Value::as_str) {
        return Err(PageError::WebDriver {
            error: error.to_string(),
            message,
        });
    }

    if let Some(code) = envelope.get("status").and_then(Value::as_i64) {
        if code != 0 {
            return Err(PageError::WebDriver {
                error: legacy_error_name(code).to_string(),
                message,
            });
        }
    }

    if !(200..300).contains(&http_status) {
        return Err(PageError::WebDriver {
            error: "unknown error".to_string(),
            message: format!("HTTP {http_status}: {body}"),
        });
    }

    Ok(envelope)
}

fn session_id_of(envelope: &Value) -> Option<String> {
    envelope
        .get("value")
        .and_then(|v| v.get("sessionId"))
        .or_else(|| envelope.get("sessionId"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
