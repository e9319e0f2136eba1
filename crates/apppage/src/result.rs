//! Result and error types for apppage.

use thiserror::Error;

/// Result type for apppage operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors that can occur while driving a page object
#[derive(Debug, Error)]
pub enum PageError {
    /// A driver command failed before reaching the wire (or in a test double)
    #[error("Driver command `{command}` failed: {message}")]
    Driver {
        /// Command name
        command: String,
        /// Error message
        message: String,
    },

    /// The remote end answered with a WebDriver error envelope
    #[error("WebDriver error `{error}`: {message}")]
    WebDriver {
        /// WebDriver error code (e.g. "no such element")
        error: String,
        /// Error message reported by the server
        message: String,
    },

    /// Selector string could not be parsed
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// Offending selector
        selector: String,
        /// Why it was rejected
        reason: String,
    },

    /// Ready element was queried but not present
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Session could not be created or the response carried no session id
    #[error("Invalid session: {message}")]
    InvalidSession {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageError {
    /// Create a driver command error
    #[must_use]
    pub fn driver(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a selector parse error
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = PageError::driver("start_app", "app not installed");
        assert_eq!(
            err.to_string(),
            "Driver command `start_app` failed: app not installed"
        );
    }

    #[test]
    fn test_webdriver_error_display() {
        let err = PageError::WebDriver {
            error: "no such element".to_string(),
            message: "gone".to_string(),
        };
        assert!(err.to_string().contains("no such element"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: PageError = parse.unwrap_err().into();
        assert!(matches!(err, PageError::Json(_)));
    }
}
