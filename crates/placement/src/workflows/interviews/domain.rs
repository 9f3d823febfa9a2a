use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::Usn;
use crate::workflows::drives::domain::DriveId;

/// Identifier wrapper for interview slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub String);

/// How the interview is conducted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMode {
    #[default]
    Online,
    Offline,
    Hybrid,
}

impl SlotMode {
    pub const fn label(self) -> &'static str {
        match self {
            SlotMode::Online => "online",
            SlotMode::Offline => "offline",
            SlotMode::Hybrid => "hybrid",
        }
    }
}

/// Lifecycle status of a slot. Only `Scheduled` slots take part in bulk
/// notification runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// Serde adapter for wall-clock times carried as `HH:MM` strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One student's interview appointment within a drive's panel day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub id: SlotId,
    pub drive_id: DriveId,
    pub drive_name: String,
    pub usn: Usn,
    pub student_name: String,
    #[serde(default)]
    pub student_email: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub mode: SlotMode,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

impl InterviewSlot {
    /// Two slots collide when the same drive books the same start time on the
    /// same day. A panel interviews one candidate per opening.
    pub fn collides_with(&self, drive_id: &DriveId, date: NaiveDate, start_time: NaiveTime) -> bool {
        self.drive_id == *drive_id && self.date == date && self.start_time == start_time
    }
}
