use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ValidationError;
use crate::types::{Timeout, Urgency};

/// A single notification, validated and ready to dispatch.
///
/// Built per call, immutable once handed to
/// [`NotificationClient::send`](crate::client::NotificationClient::send),
/// never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationRequest {
    pub summary: String,
    pub body: String,
    pub timeout: Timeout,
    pub urgency: Urgency,
    pub append: bool,
    pub transient: bool,
    pub icon: Option<PathBuf>,
}

impl Default for NotificationRequest {
    /// Every field at its default: empty summary and body, server-default
    /// timeout, normal urgency, append on, transient off, no icon.
    fn default() -> Self {
        Self {
            summary: String::new(),
            body: String::new(),
            timeout: Timeout::Default,
            urgency: Urgency::Normal,
            append: true,
            transient: false,
            icon: None,
        }
    }
}

impl NotificationRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }
}

/// Loosely-typed input for one timeout field: a typed [`Timeout`], fractional
/// seconds, or a string with explicit units.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TimeoutSpec {
    Fixed(Timeout),
    Seconds(f64),
    Text(String),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum UrgencySpec {
    Named(Urgency),
    Text(String),
}

/// Unvalidated request configuration.
///
/// Carries exactly the options of [`NotificationRequest`], each optional.
/// Deserializable, so request templates can come straight out of caller
/// configuration; [`build`](Self::build) is the single validation point.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestBuilder {
    summary: Option<String>,
    body: Option<String>,
    timeout: Option<TimeoutSpec>,
    urgency: Option<UrgencySpec>,
    append: Option<bool>,
    transient: Option<bool>,
    icon: Option<PathBuf>,
}

impl RequestBuilder {
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(TimeoutSpec::Fixed(timeout));
        self
    }

    /// Timeout in fractional seconds; validated in [`build`](Self::build).
    #[must_use]
    pub fn timeout_secs(mut self, seconds: f64) -> Self {
        self.timeout = Some(TimeoutSpec::Seconds(seconds));
        self
    }

    #[must_use]
    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(UrgencySpec::Named(urgency));
        self
    }

    /// Urgency by name (`"low"`, `"normal"`, `"critical"`); validated in
    /// [`build`](Self::build).
    #[must_use]
    pub fn urgency_name(mut self, urgency: impl Into<String>) -> Self {
        self.urgency = Some(UrgencySpec::Text(urgency.into()));
        self
    }

    #[must_use]
    pub fn append(mut self, append: bool) -> Self {
        self.append = Some(append);
        self
    }

    #[must_use]
    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = Some(transient);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Validates the configuration and produces the immutable request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the urgency is not one of the three
    /// recognized levels, when a timeout is negative or not finite, when a
    /// timeout string cannot be parsed, or when the icon path is empty.
    pub fn build(self) -> Result<NotificationRequest, ValidationError> {
        let urgency = match self.urgency {
            None => Urgency::Normal,
            Some(UrgencySpec::Named(urgency)) => urgency,
            Some(UrgencySpec::Text(text)) => Urgency::from_str(&text)?,
        };

        let timeout = match self.timeout {
            None => Timeout::Default,
            Some(TimeoutSpec::Fixed(timeout)) => timeout,
            Some(TimeoutSpec::Seconds(seconds)) => Timeout::from_secs_f64(seconds)?,
            Some(TimeoutSpec::Text(text)) => Timeout::from_str(&text)?,
        };

        if let Some(icon) = &self.icon {
            if icon.as_os_str().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "icon",
                    message: "path is empty".to_string(),
                });
            }
        }

        Ok(NotificationRequest {
            summary: self.summary.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            timeout,
            urgency,
            append: self.append.unwrap_or(true),
            transient: self.transient.unwrap_or(false),
            icon: self.icon,
        })
    }
}
