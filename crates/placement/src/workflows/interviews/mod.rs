//! Interview scheduling: slot booking with overlap protection, candidate
//! selection, and calendar-linked reminders.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod service;

pub use domain::{InterviewSlot, SlotId, SlotMode, SlotStatus};
pub use repository::SlotRepository;
pub use router::interview_router;
pub use scheduler::{bulk_notification_message, calendar_link, format_time_12h, notification_message};
pub use service::{InterviewError, InterviewService, NewSlot, NotifyOutcome, SlotUpdate};
