use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

/// Rejected before anything touches the bus.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown urgency: {value} (expected low, normal or critical)")]
    UnknownUrgency { value: String },
    #[error("timeout must not be negative, got {seconds}")]
    NegativeTimeout { seconds: f64 },
    #[error("invalid timeout {value:?}: {message}")]
    InvalidTimeout { value: String, message: String },
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// A dispatch that reached the transport layer and failed. Never retried
/// internally; the caller owns any retry policy.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("notification service unreachable")]
    ServiceUnavailable {
        #[source]
        source: Option<zbus::Error>,
    },
    #[error("notification service rejected the request: {message}")]
    InvalidRequest { message: String },
    #[error("dispatch did not complete within {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl DispatchError {
    #[must_use]
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}
