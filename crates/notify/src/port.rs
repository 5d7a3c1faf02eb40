//! Notification port (outbound side-channel abstraction).

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::notification::Notification;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Delivery to the downstream channel failed.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Accepts notifications for asynchronous delivery.
///
/// Implementations may queue, batch, or drop; the engine makes no assumptions
/// beyond "send returns quickly". Delivery guarantees are the implementation's
/// business — the engine treats every send as best-effort.
pub trait NotificationPort: Send + Sync {
    fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

impl<P> NotificationPort for Arc<P>
where
    P: NotificationPort + ?Sized,
{
    fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        (**self).send(notification)
    }
}

/// Fire-and-forget dispatch: a failed send is logged at `warn` and swallowed.
///
/// This is the only way the engine talks to the port. Notification failures
/// never escalate into transition failures.
pub fn dispatch<P: NotificationPort + ?Sized>(port: &P, notification: Notification) {
    let template = notification.template();
    let recipient = notification.recipient;
    if let Err(e) = port.send(notification) {
        warn!(template, %recipient, error = %e, "notification dropped");
    }
}
