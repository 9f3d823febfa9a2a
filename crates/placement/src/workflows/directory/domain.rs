use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::assessments::domain::{AssessmentId, AssessmentScore};
use crate::workflows::drives::domain::{DriveApplication, DriveId};

/// University seat number, the unique roll-number key for a student.
/// Always stored uppercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Usn(pub String);

impl Usn {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }
}

impl fmt::Display for Usn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable student record with academic attributes and the per-drive and
/// per-assessment sublists the engines maintain. Numeric fields are optional:
/// a missing value always fails eligibility predicates rather than passing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub usn: Usn,
    pub branch: String,
    pub year: Option<u32>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub assessment_scores: Vec<AssessmentScore>,
    #[serde(default)]
    pub drive_applications: Vec<DriveApplication>,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn application_for(&self, drive_id: &DriveId) -> Option<&DriveApplication> {
        self.drive_applications
            .iter()
            .find(|application| &application.drive_id == drive_id)
    }

    pub fn application_for_mut(&mut self, drive_id: &DriveId) -> Option<&mut DriveApplication> {
        self.drive_applications
            .iter_mut()
            .find(|application| &application.drive_id == drive_id)
    }

    /// Insert an `eligible` application record if none exists for the drive.
    /// Returns whether a record was inserted.
    pub fn ensure_application(&mut self, drive_id: &DriveId) -> bool {
        if self.application_for(drive_id).is_some() {
            return false;
        }
        self.drive_applications
            .push(DriveApplication::eligible(drive_id.clone()));
        true
    }

    /// Append a score entry unless one already exists for the assessment.
    /// Returns whether an entry was appended.
    pub fn record_assessment_score(&mut self, entry: AssessmentScore) -> bool {
        if self.has_assessment_score(&entry.assessment_id) {
            return false;
        }
        self.assessment_scores.push(entry);
        true
    }

    pub fn has_assessment_score(&self, assessment_id: &AssessmentId) -> bool {
        self.assessment_scores
            .iter()
            .any(|entry| &entry.assessment_id == assessment_id)
    }
}
