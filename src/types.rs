use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Priority hint forwarded to the notification server.
///
/// Servers decide presentation per level; critical notifications typically do
/// not expire on their own.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }

    /// Byte value of the `urgency` hint on the wire.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::Critical => 2,
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "critical" => Ok(Self::Critical),
            other => Err(ValidationError::UnknownUrgency {
                value: other.to_string(),
            }),
        }
    }
}

/// Display duration of a notification. The unit is always explicit: callers
/// pass a [`Duration`], seconds, or milliseconds, never a bare number whose
/// unit is guessed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeout {
    /// Expire whenever the server's own default says so.
    #[default]
    Default,
    /// Never expire; the user dismisses the notification.
    Never,
    Milliseconds(u32),
}

impl Timeout {
    /// Builds a timeout from fractional seconds.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `seconds` is negative or not finite.
    pub fn from_secs_f64(seconds: f64) -> Result<Self, ValidationError> {
        if !seconds.is_finite() {
            return Err(ValidationError::InvalidTimeout {
                value: seconds.to_string(),
                message: "not a finite number".to_string(),
            });
        }
        if seconds < 0.0 {
            return Err(ValidationError::NegativeTimeout { seconds });
        }
        Ok(Self::Milliseconds((seconds * 1000.0).round() as u32))
    }

    #[must_use]
    pub const fn from_millis(millis: u32) -> Self {
        Self::Milliseconds(millis)
    }

    /// Value of the `expire_timeout` parameter of `Notify`: -1 asks for the
    /// server default, 0 means never expire, anything positive is a duration
    /// in milliseconds.
    #[must_use]
    pub const fn into_i32(self) -> i32 {
        match self {
            Self::Default => -1,
            Self::Never => 0,
            Self::Milliseconds(ms) => {
                if ms > i32::MAX as u32 {
                    i32::MAX
                } else {
                    ms as i32
                }
            }
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        let ms = duration.as_millis();
        Self::Milliseconds(u32::try_from(ms).unwrap_or(u32::MAX))
    }
}

impl Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Never => f.write_str("never"),
            Self::Milliseconds(ms) => write!(f, "{ms}ms"),
        }
    }
}

impl FromStr for Timeout {
    type Err = ValidationError;

    /// Accepts `"default"`, `"never"`, or a duration with explicit units
    /// (`"2s"`, `"1m 30s"`, `"500ms"`). Unitless numbers are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "never" => Ok(Self::Never),
            trimmed => humantime::parse_duration(trimmed)
                .map(Self::from)
                .map_err(|err| ValidationError::InvalidTimeout {
                    value: s.to_string(),
                    message: err.to_string(),
                }),
        }
    }
}
