#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use toastbus::{
    ClientOptions, DispatchError, NotificationClient, NotificationRequest, Transport, Urgency,
    WireNotification,
};

/// In-process stand-in for the notification service: records every call,
/// hands out sequential ids, and can be flipped to "unreachable".
#[derive(Clone, Default)]
struct StubBus {
    calls: Arc<Mutex<Vec<WireNotification>>>,
    closed: Arc<Mutex<Vec<u32>>>,
    unreachable: bool,
}

impl StubBus {
    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn recorded(&self) -> Vec<WireNotification> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Transport for StubBus {
    async fn notify(&self, wire: &WireNotification) -> Result<u32, DispatchError> {
        if self.unreachable {
            return Err(DispatchError::ServiceUnavailable { source: None });
        }
        let mut calls = self.calls.lock().expect("calls lock");
        calls.push(wire.clone());
        // Servers keep the id stable when replacing an existing notification.
        if wire.replaces_id != 0 {
            Ok(wire.replaces_id)
        } else {
            Ok(calls.len() as u32)
        }
    }

    async fn close(&self, id: u32) -> Result<(), DispatchError> {
        if self.unreachable {
            return Err(DispatchError::ServiceUnavailable { source: None });
        }
        self.closed.lock().expect("closed lock").push(id);
        Ok(())
    }
}

fn client(stub: &StubBus) -> NotificationClient<StubBus> {
    let options = ClientOptions::default()
        .appname("toastbus-tests")
        .dispatch_timeout(Duration::from_secs(1));
    NotificationClient::with_transport(stub.clone(), options)
}

#[tokio::test]
async fn send_records_the_mapped_call_and_returns_an_id() {
    let stub = StubBus::default();
    let request = NotificationRequest::builder()
        .summary("world")
        .body("hello")
        .timeout_secs(2.5)
        .build()
        .expect("valid request");

    let id = client(&stub).send(&request).await.expect("send");
    assert_eq!(id.get(), 1);

    let calls = stub.recorded();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].summary, "world");
    assert_eq!(calls[0].body, "hello");
    assert_eq!(calls[0].expire_timeout, 2500);
    assert_eq!(calls[0].appname, "toastbus-tests");
    assert_eq!(calls[0].replaces_id, 0);
}

#[tokio::test]
async fn unreachable_service_surfaces_as_service_unavailable() {
    let stub = StubBus::unreachable();
    let err = client(&stub)
        .send(&NotificationRequest::new())
        .await
        .expect_err("send must fail");
    assert!(err.is_service_unavailable());
    assert!(stub.recorded().is_empty());
}

#[tokio::test]
async fn replace_threads_the_id_through() {
    let stub = StubBus::default();
    let client = client(&stub);

    let first = client
        .send(&NotificationRequest::builder().summary("1/3").build().expect("request"))
        .await
        .expect("send");

    let updated = client
        .replace(
            first,
            &NotificationRequest::builder().summary("2/3").build().expect("request"),
        )
        .await
        .expect("replace");
    assert_eq!(updated, first);

    let calls = stub.recorded();
    assert_eq!(calls[1].replaces_id, first.get());
    assert_eq!(calls[1].summary, "2/3");
}

#[tokio::test]
async fn close_reaches_the_service() {
    let stub = StubBus::default();
    let client = client(&stub);

    let id = client
        .send(&NotificationRequest::new())
        .await
        .expect("send");
    client.close(id).await.expect("close");

    assert_eq!(*stub.closed.lock().expect("closed lock"), vec![id.get()]);
}

#[test]
fn telemetry_installs_exactly_once() {
    assert!(toastbus::telemetry::init_tracing(Some("toastbus=debug"), false).is_ok());
    assert!(toastbus::telemetry::init_tracing(None, false).is_err());
}

#[tokio::test]
async fn critical_transient_request_arrives_unchanged() {
    let stub = StubBus::default();
    let request = NotificationRequest::builder()
        .urgency(Urgency::Critical)
        .append(false)
        .transient(true)
        .build()
        .expect("valid request");
    assert_eq!(request.urgency, Urgency::Critical);
    assert!(!request.append);
    assert!(request.transient);

    client(&stub).send(&request).await.expect("send");

    let calls = stub.recorded();
    assert!(!calls[0].hints.contains_key("x-canonical-append"));
    assert!(calls[0].hints.contains_key("transient"));
}
