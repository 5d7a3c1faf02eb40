//! Test doubles for the notification port.

use std::sync::Mutex;

use crate::notification::Notification;
use crate::port::{NotificationPort, NotifyError};

/// Records every notification it is handed (tests/dev).
#[derive(Debug, Default)]
pub struct RecordingPort {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Templates of everything sent so far, in send order.
    pub fn templates(&self) -> Vec<&'static str> {
        self.sent().iter().map(|n| n.template()).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.sent.lock() {
            v.clear();
        }
    }
}

impl NotificationPort for RecordingPort {
    fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|_| NotifyError::Delivery("recorder lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}

/// Always fails to deliver (verifies fire-and-forget semantics).
#[derive(Debug, Default)]
pub struct FailingPort;

impl NotificationPort for FailingPort {
    fn send(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("downstream unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::dispatch;
    use crate::NotificationKind;
    use chrono::Utc;
    use jobgrid_core::AccountId;

    #[test]
    fn recording_port_captures_template_order() {
        let port = RecordingPort::new();
        let who = AccountId::new();
        dispatch(
            &port,
            Notification::new(who, NotificationKind::BusinessApproved, Utc::now()),
        );
        dispatch(
            &port,
            Notification::new(who, NotificationKind::BusinessRevoked, Utc::now()),
        );
        assert_eq!(port.templates(), vec!["business.approved", "business.revoked"]);
    }

    #[test]
    fn dispatch_swallows_delivery_failure() {
        // Must not panic or propagate.
        dispatch(
            &FailingPort,
            Notification::new(AccountId::new(), NotificationKind::BusinessRevoked, Utc::now()),
        );
    }
}
