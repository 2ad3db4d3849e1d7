use std::time::Duration;

use humantime::parse_duration;

use crate::error::ValidationError;

const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(2);

const ENV_APPNAME: &str = "TOASTBUS_APPNAME";
const ENV_BUS: &str = "TOASTBUS_BUS";
const ENV_DISPATCH_TIMEOUT: &str = "TOASTBUS_DISPATCH_TIMEOUT";

/// Per-client settings. Requests carry everything notification-specific;
/// these are the ambient knobs around dispatching them.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Application name passed to the server; desktops use it to group
    /// notifications.
    pub appname: String,
    /// Upper bound for one bus call before `send` gives up with a timeout
    /// error.
    pub dispatch_timeout: Duration,
    /// Well-known bus name override; `None` targets the freedesktop service.
    pub bus: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            appname: default_appname(),
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            bus: None,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn appname(mut self, appname: impl Into<String>) -> Self {
        self.appname = appname.into();
        self
    }

    #[must_use]
    pub const fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = Some(bus.into());
        self
    }

    /// Defaults with `TOASTBUS_APPNAME`, `TOASTBUS_BUS` and
    /// `TOASTBUS_DISPATCH_TIMEOUT` (humantime syntax, e.g. `"2s"`) applied on
    /// top.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when an override is present but invalid;
    /// overrides are never silently ignored.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut options = Self::default();
        if let Some(appname) = env_string(ENV_APPNAME)? {
            options.appname = appname;
        }
        if let Some(bus) = env_string(ENV_BUS)? {
            options.bus = Some(bus);
        }
        if let Some(timeout) = env_duration(ENV_DISPATCH_TIMEOUT)? {
            options.dispatch_timeout = timeout;
        }
        Ok(options)
    }
}

// The executable's file stem, matching what desktops expect as a grouping key.
fn default_appname() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn env_string(key: &'static str) -> Result<Option<String>, ValidationError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ValidationError::InvalidField {
            field: key,
            message: err.to_string(),
        }),
    }
}

fn env_duration(key: &'static str) -> Result<Option<Duration>, ValidationError> {
    match env_string(key)? {
        Some(value) => parse_duration(value.trim())
            .map(Some)
            .map_err(|err| ValidationError::InvalidField {
                field: key,
                message: err.to_string(),
            }),
        None => Ok(None),
    }
}
