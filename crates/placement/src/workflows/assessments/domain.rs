use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::Usn;
use crate::workflows::drives::domain::DriveId;

/// Identifier wrapper for assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for assessment attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

fn default_marks() -> u32 {
    1
}

fn default_time_limit() -> u32 {
    30
}

/// Single multiple-choice question with a correct-option index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default)]
    pub topic: Option<String>,
}

/// A quiz published to students, optionally tied to a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub title: String,
    pub kind: String,
    pub drive_id: Option<DriveId>,
    pub questions: Vec<Question>,
    pub time_limit_minutes: u32,
    pub total_marks: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted when an operator creates an assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAssessment {
    pub title: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub drive_id: Option<DriveId>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
}

fn default_kind() -> String {
    "Mixed".to_string()
}

/// Per-assessment score entry appended to the student profile on first
/// submission. At most one entry exists per (assessment, student) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScore {
    pub assessment_id: AssessmentId,
    pub score: u32,
    pub max_score: u32,
    pub submitted_at: DateTime<Utc>,
}

/// Attempt lifecycle. `Submitted` and `Malpractice` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
    Malpractice,
}

impl AttemptStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "in-progress",
            AttemptStatus::Submitted => "submitted",
            AttemptStatus::Malpractice => "malpractice",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, AttemptStatus::Submitted | AttemptStatus::Malpractice)
    }
}

/// Integrity event recorded when the proctoring front-end reports a
/// tab-switch or visibility loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalpracticeEvent {
    pub event: String,
    pub at: DateTime<Utc>,
}

/// Number of warnings that flips an attempt to malpractice.
pub const WARNING_LIMIT: u32 = 3;

/// Outcome of registering one warning event against an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningOutcome {
    /// Counted; the attempt is still in progress.
    Recorded { warnings: u32 },
    /// This warning crossed the limit and froze the attempt.
    Flagged,
    /// The attempt was already terminal; nothing changed.
    Ignored,
}

/// One student's run through one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentAttempt {
    pub id: AttemptId,
    pub assessment_id: AssessmentId,
    pub usn: Usn,
    pub student_name: String,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: HashMap<usize, String>,
    pub score: Option<u32>,
    pub max_score: Option<u32>,
    pub warnings: u32,
    #[serde(default)]
    pub malpractice_log: Vec<MalpracticeEvent>,
}

impl AssessmentAttempt {
    pub fn begin(id: AttemptId, assessment_id: AssessmentId, usn: Usn, student_name: String) -> Self {
        Self {
            id,
            assessment_id,
            usn,
            student_name,
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            submitted_at: None,
            answers: HashMap::new(),
            score: None,
            max_score: None,
            warnings: 0,
            malpractice_log: Vec::new(),
        }
    }

    /// Register one integrity warning. The third warning moves the attempt to
    /// `Malpractice` and freezes the submission time; later events on a
    /// terminal attempt are ignored outright.
    pub fn register_warning(&mut self, event: &str, at: DateTime<Utc>) -> WarningOutcome {
        if self.status.is_terminal() {
            return WarningOutcome::Ignored;
        }

        self.warnings += 1;
        self.malpractice_log.push(MalpracticeEvent {
            event: event.to_string(),
            at,
        });

        if self.warnings >= WARNING_LIMIT {
            self.status = AttemptStatus::Malpractice;
            self.submitted_at = Some(at);
            return WarningOutcome::Flagged;
        }

        WarningOutcome::Recorded {
            warnings: self.warnings,
        }
    }
}
