//! The outbound side: one capability, "show a notification", spoken over the
//! session bus to `org.freedesktop.Notifications`.

use std::collections::HashMap;
use std::future::Future;

use zbus::Connection;
use zbus::names::WellKnownName;
use zbus::zvariant::Value;

use crate::error::DispatchError;
use crate::request::NotificationRequest;

pub(crate) const NOTIFICATION_BUS: &str = "org.freedesktop.Notifications";
pub(crate) const NOTIFICATION_OBJECTPATH: &str = "/org/freedesktop/Notifications";

// Hint keys. `x-canonical-append` is the merge-into-existing convention;
// `transient` and `urgency` are standardized.
const HINT_APPEND: &str = "x-canonical-append";
const HINT_TRANSIENT: &str = "transient";
const HINT_URGENCY: &str = "urgency";

/// How the transport carries a hint value; converted to a D-Bus variant only
/// at the bus boundary so test doubles can inspect plain data.
#[derive(Clone, Debug, PartialEq)]
pub enum HintValue {
    Bool(bool),
    Byte(u8),
    Text(String),
}

impl HintValue {
    fn as_value(&self) -> Value<'_> {
        match self {
            Self::Bool(flag) => Value::from(*flag),
            Self::Byte(byte) => Value::U8(*byte),
            Self::Text(text) => Value::from(text.as_str()),
        }
    }
}

/// The parameter set of the `Notify` method, with the request fields already
/// mapped onto it.
#[derive(Clone, Debug, PartialEq)]
pub struct WireNotification {
    pub appname: String,
    pub replaces_id: u32,
    pub icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<String>,
    pub hints: HashMap<&'static str, HintValue>,
    pub expire_timeout: i32,
}

impl WireNotification {
    pub(crate) fn from_request(
        request: &NotificationRequest,
        appname: &str,
        replaces_id: u32,
    ) -> Self {
        let mut hints = HashMap::new();
        hints.insert(HINT_URGENCY, HintValue::Byte(request.urgency.as_byte()));
        if request.transient {
            hints.insert(HINT_TRANSIENT, HintValue::Bool(true));
        }
        if request.append {
            hints.insert(HINT_APPEND, HintValue::Text("true".to_string()));
        }

        Self {
            appname: appname.to_string(),
            replaces_id,
            icon: request
                .icon
                .as_deref()
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_default(),
            summary: request.summary.clone(),
            body: request.body.clone(),
            actions: Vec::new(),
            hints,
            expire_timeout: request.timeout.into_i32(),
        }
    }
}

/// The single external collaborator of this library.
///
/// Production code uses [`BusTransport`]; tests substitute a recording stub.
pub trait Transport {
    /// Delivers one notification and returns the server-assigned id.
    fn notify(
        &self,
        wire: &WireNotification,
    ) -> impl Future<Output = Result<u32, DispatchError>> + Send;

    /// Asks the server to dismiss a previously shown notification.
    fn close(&self, id: u32) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// Talks to the notification service over the D-Bus session bus.
#[derive(Clone, Debug)]
pub struct BusTransport {
    connection: Connection,
    destination: String,
}

impl BusTransport {
    /// Connects to the session bus, targeting the well-known notification
    /// service name unless `destination` overrides it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidRequest`] for a malformed destination
    /// name and [`DispatchError::ServiceUnavailable`] when the session bus
    /// cannot be reached.
    pub async fn session(destination: Option<&str>) -> Result<Self, DispatchError> {
        let destination = destination.unwrap_or(NOTIFICATION_BUS);
        WellKnownName::try_from(destination).map_err(|err| DispatchError::InvalidRequest {
            message: format!("bad destination {destination:?}: {err}"),
        })?;

        let connection = Connection::session()
            .await
            .map_err(|err| DispatchError::ServiceUnavailable { source: Some(err) })?;

        Ok(Self {
            connection,
            destination: destination.to_string(),
        })
    }
}

impl Transport for BusTransport {
    async fn notify(&self, wire: &WireNotification) -> Result<u32, DispatchError> {
        let hints: HashMap<&str, Value<'_>> = wire
            .hints
            .iter()
            .map(|(key, value)| (*key, value.as_value()))
            .collect();

        let reply = self
            .connection
            .call_method(
                Some(self.destination.as_str()),
                NOTIFICATION_OBJECTPATH,
                Some(NOTIFICATION_BUS),
                "Notify",
                &(
                    &wire.appname,
                    wire.replaces_id,
                    &wire.icon,
                    &wire.summary,
                    &wire.body,
                    &wire.actions,
                    hints,
                    wire.expire_timeout,
                ),
            )
            .await
            .map_err(map_bus_error)?;

        reply
            .body()
            .deserialize::<u32>()
            .map_err(|err| DispatchError::InvalidRequest {
                message: format!("malformed Notify reply: {err}"),
            })
    }

    async fn close(&self, id: u32) -> Result<(), DispatchError> {
        self.connection
            .call_method(
                Some(self.destination.as_str()),
                NOTIFICATION_OBJECTPATH,
                Some(NOTIFICATION_BUS),
                "CloseNotification",
                &(id),
            )
            .await
            .map_err(map_bus_error)?;
        Ok(())
    }
}

fn map_bus_error(err: zbus::Error) -> DispatchError {
    match err {
        zbus::Error::MethodError(name, message, _) => DispatchError::InvalidRequest {
            message: message.unwrap_or_else(|| name.to_string()),
        },
        other => DispatchError::ServiceUnavailable {
            source: Some(other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{HINT_APPEND, HINT_TRANSIENT, HINT_URGENCY, HintValue, WireNotification};
    use crate::request::NotificationRequest;
    use crate::types::{Timeout, Urgency};

    #[test]
    fn request_fields_map_onto_notify_parameters() {
        let request = match NotificationRequest::builder()
            .summary("world")
            .body("hello")
            .timeout(Timeout::Milliseconds(2500))
            .icon("/tmp/icon.svg")
            .build()
        {
            Ok(request) => request,
            Err(err) => panic!("build failed: {err}"),
        };

        let wire = WireNotification::from_request(&request, "toastbus", 0);
        assert_eq!(wire.summary, "world");
        assert_eq!(wire.body, "hello");
        assert_eq!(wire.expire_timeout, 2500);
        assert_eq!(wire.icon, "/tmp/icon.svg");
        assert_eq!(wire.replaces_id, 0);
        assert!(wire.actions.is_empty());
    }

    #[test]
    fn default_request_carries_append_and_urgency_hints_only() {
        let wire = WireNotification::from_request(&NotificationRequest::new(), "toastbus", 0);
        assert_eq!(
            wire.hints.get(HINT_URGENCY),
            Some(&HintValue::Byte(Urgency::Normal.as_byte()))
        );
        assert_eq!(
            wire.hints.get(HINT_APPEND),
            Some(&HintValue::Text("true".to_string()))
        );
        assert!(!wire.hints.contains_key(HINT_TRANSIENT));
        assert_eq!(wire.expire_timeout, -1);
    }

    #[test]
    fn transient_without_append_flips_the_hints() {
        let request = match NotificationRequest::builder()
            .append(false)
            .transient(true)
            .urgency(Urgency::Critical)
            .build()
        {
            Ok(request) => request,
            Err(err) => panic!("build failed: {err}"),
        };

        let wire = WireNotification::from_request(&request, "toastbus", 7);
        assert!(!wire.hints.contains_key(HINT_APPEND));
        assert_eq!(wire.hints.get(HINT_TRANSIENT), Some(&HintValue::Bool(true)));
        assert_eq!(wire.hints.get(HINT_URGENCY), Some(&HintValue::Byte(2)));
        assert_eq!(wire.replaces_id, 7);
    }
}
