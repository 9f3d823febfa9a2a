//! Notification dispatch and the student inbox.
//!
//! The dispatcher is the only writer of notification records; drive publishes,
//! shortlists, and interview reminders all funnel through it so that replayed
//! operator actions update the same inbox entry instead of duplicating it.

pub mod dispatcher;
pub mod domain;
pub mod router;
pub mod store;

pub use dispatcher::{NoticeRequest, NotificationDispatcher};
pub use domain::{Notification, NotificationCategory, NotificationId};
pub use router::notification_router;
pub use store::{NotificationKey, NotificationStore};
