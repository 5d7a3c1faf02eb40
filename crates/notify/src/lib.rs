//! `jobgrid-notify` — outbound notification port.
//!
//! Notifications are a **side channel**, not part of the transactional core.
//! A lifecycle transition commits regardless of notification outcome: dispatch
//! is fire-and-forget, a failed send is logged and swallowed, never retried,
//! and never rolls back state. Consumers (email templating, push, etc.) live
//! behind the port and are out of scope here.

pub mod notification;
pub mod port;
pub mod recording;

pub use notification::{Notification, NotificationKind};
pub use port::{dispatch, NotificationPort, NotifyError};
pub use recording::{FailingPort, RecordingPort};
