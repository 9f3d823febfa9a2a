use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::Usn;
use crate::workflows::drives::domain::DriveId;

/// Identifier wrapper for persisted notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

/// Category tag shown in the student inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Drive,
    Assessment,
    Shortlist,
    General,
}

impl NotificationCategory {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationCategory::Drive => "drive",
            NotificationCategory::Assessment => "assessment",
            NotificationCategory::Shortlist => "shortlist",
            NotificationCategory::General => "general",
        }
    }
}

/// Append-only notification record targeted at a single student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub usn: Usn,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub drive_id: Option<DriveId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
