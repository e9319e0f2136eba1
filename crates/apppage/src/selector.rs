//! Selector strings for native mobile elements.
//!
//! Selectors use the prefix grammar mobile WebDriver clients accept:
//!
//! | Input                         | Strategy               |
//! |-------------------------------|------------------------|
//! | `id=pkg:id/name`              | `id`                   |
//! | `~label`                      | `accessibility id`     |
//! | `//node[@x]`, `(//node)[1]`   | `xpath`                |
//! | `android=new UiSelector()...` | `-android uiautomator` |
//! | `class=android.widget.Button` | `class name`           |

use crate::result::{PageError, PageResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Selector for locating a native element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Resource id (e.g. `com.google.android.calculator:id/main_calculator`)
    Id(String),
    /// Accessibility id (content-desc on Android)
    AccessibilityId(String),
    /// XPath expression
    XPath(String),
    /// UiAutomator selector expression
    UiAutomator(String),
    /// Widget class name
    ClassName(String),
}

impl Selector {
    /// Create a resource id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create an accessibility id selector
    #[must_use]
    pub fn accessibility_id(label: impl Into<String>) -> Self {
        Self::AccessibilityId(label.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Parse a selector string
    pub fn parse(input: &str) -> PageResult<Self> {
        let input = input.trim();
        let (selector, value) = if let Some(rest) = input.strip_prefix("id=") {
            (Self::Id(rest.to_string()), rest)
        } else if let Some(rest) = input.strip_prefix('~') {
            (Self::AccessibilityId(rest.to_string()), rest)
        } else if let Some(rest) = input.strip_prefix("android=") {
            (Self::UiAutomator(rest.to_string()), rest)
        } else if let Some(rest) = input.strip_prefix("class=") {
            (Self::ClassName(rest.to_string()), rest)
        } else if input.starts_with("//") || input.starts_with("(//") {
            (Self::XPath(input.to_string()), input)
        } else {
            return Err(PageError::invalid_selector(
                input,
                "expected one of `id=`, `~`, `//`, `android=`, `class=`",
            ));
        };

        if value.trim().is_empty() {
            return Err(PageError::invalid_selector(input, "empty selector value"));
        }
        Ok(selector)
    }

    /// WebDriver location strategy name
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::AccessibilityId(_) => "accessibility id",
            Self::XPath(_) => "xpath",
            Self::UiAutomator(_) => "-android uiautomator",
            Self::ClassName(_) => "class name",
        }
    }

    /// Raw selector value sent to the driver
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v)
            | Self::AccessibilityId(v)
            | Self::XPath(v)
            | Self::UiAutomator(v)
            | Self::ClassName(v) => v,
        }
    }

    /// Request body for `find element(s)`
    #[must_use]
    pub fn to_locator(&self) -> serde_json::Value {
        serde_json::json!({
            "using": self.strategy(),
            "value": self.value(),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "id={v}"),
            Self::AccessibilityId(v) => write!(f, "~{v}"),
            Self::XPath(v) => write!(f, "{v}"),
            Self::UiAutomator(v) => write!(f, "android={v}"),
            Self::ClassName(v) => write!(f, "class={v}"),
        }
    }
}

impl FromStr for Selector {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
