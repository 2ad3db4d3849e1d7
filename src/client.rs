use std::fmt::{self, Display};

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::bus::{BusTransport, Transport, WireNotification};
use crate::config::ClientOptions;
use crate::error::DispatchError;
use crate::request::NotificationRequest;

/// Server-assigned identifier of a displayed notification. Feed it back into
/// [`NotificationClient::replace`] or [`NotificationClient::close`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NotificationId(u32);

impl NotificationId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dispatches validated [`NotificationRequest`]s to the notification service.
///
/// One bus call per operation, bounded by the configured dispatch timeout.
/// Failures surface as typed [`DispatchError`]s; nothing is retried here.
pub struct NotificationClient<T = BusTransport> {
    transport: T,
    options: ClientOptions,
}

impl NotificationClient<BusTransport> {
    /// Connects to the session bus with default [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ServiceUnavailable`] when the bus cannot be
    /// reached.
    pub async fn connect() -> Result<Self, DispatchError> {
        Self::connect_with(ClientOptions::default()).await
    }

    /// Connects to the session bus with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidRequest`] for a malformed bus name
    /// override and [`DispatchError::ServiceUnavailable`] when the bus cannot
    /// be reached.
    pub async fn connect_with(options: ClientOptions) -> Result<Self, DispatchError> {
        let transport = BusTransport::session(options.bus.as_deref()).await?;
        Ok(Self { transport, options })
    }
}

impl<T: Transport> NotificationClient<T> {
    /// Wires the client to an arbitrary transport. Test code hands in stubs
    /// here.
    pub fn with_transport(transport: T, options: ClientOptions) -> Self {
        Self { transport, options }
    }

    /// Shows one notification and returns its server-assigned id.
    ///
    /// # Errors
    ///
    /// [`DispatchError::ServiceUnavailable`] when the service is unreachable,
    /// [`DispatchError::InvalidRequest`] when it rejects the parameters, and
    /// [`DispatchError::Timeout`] when the call exceeds the dispatch timeout.
    pub async fn send(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationId, DispatchError> {
        self.dispatch(request, 0).await
    }

    /// Re-dispatches a request so the server updates the notification shown
    /// under `id` instead of creating a new popup.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`send`](Self::send).
    pub async fn replace(
        &self,
        id: NotificationId,
        request: &NotificationRequest,
    ) -> Result<NotificationId, DispatchError> {
        self.dispatch(request, id.get()).await
    }

    /// Asks the server to dismiss the notification shown under `id`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`send`](Self::send).
    pub async fn close(&self, id: NotificationId) -> Result<(), DispatchError> {
        let wait = self.options.dispatch_timeout;
        match timeout(wait, self.transport.close(id.get())).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout { elapsed: wait }),
        }
    }

    async fn dispatch(
        &self,
        request: &NotificationRequest,
        replaces_id: u32,
    ) -> Result<NotificationId, DispatchError> {
        let wire = WireNotification::from_request(request, &self.options.appname, replaces_id);
        debug!(
            summary = %wire.summary,
            urgency = %request.urgency,
            timeout = %request.timeout,
            replaces_id,
            "dispatching notification"
        );

        let wait = self.options.dispatch_timeout;
        let outcome = match timeout(wait, self.transport.notify(&wire)).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout { elapsed: wait }),
        };

        match outcome {
            Ok(id) => {
                debug!(id, "notification displayed");
                Ok(NotificationId(id))
            }
            Err(err) => {
                warn!(error = %err, summary = %wire.summary, "dispatch failed");
                Err(err)
            }
        }
    }
}
