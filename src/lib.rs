#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Client library for the freedesktop desktop-notification service.
//!
//! Build a [`NotificationRequest`], hand it to a [`NotificationClient`], get
//! back the id of the displayed notification:
//!
//! ```no_run
//! # async fn demo() -> toastbus::Result<()> {
//! use toastbus::{NotificationClient, NotificationRequest};
//!
//! let client = NotificationClient::connect().await?;
//! let request = NotificationRequest::builder()
//!     .summary("world")
//!     .body("hello")
//!     .timeout_secs(2.5)
//!     .build()?;
//! client.send(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod telemetry;
pub mod types;

pub use bus::{BusTransport, Transport, WireNotification};
pub use client::{NotificationClient, NotificationId};
pub use config::ClientOptions;
pub use error::{DispatchError, Error, ValidationError};
pub use request::{NotificationRequest, RequestBuilder};
pub use types::{Timeout, Urgency};

pub type Result<T> = std::result::Result<T, error::Error>;
