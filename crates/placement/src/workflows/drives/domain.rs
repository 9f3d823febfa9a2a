use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for company drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriveId(pub String);

/// Lifecycle status of a recruiting drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    Upcoming,
    Active,
    Completed,
}

impl DriveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DriveStatus::Upcoming => "upcoming",
            DriveStatus::Active => "active",
            DriveStatus::Completed => "completed",
        }
    }

    /// Drives students can still apply to.
    pub const fn is_open(self) -> bool {
        matches!(self, DriveStatus::Upcoming | DriveStatus::Active)
    }
}

/// Conjunctive predicate set a student must satisfy to apply to a drive.
/// Empty branch/year allow-lists admit every branch/year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_cgpa: f64,
    #[serde(default)]
    pub max_backlogs: u32,
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    #[serde(default)]
    pub eligible_years: Vec<u32>,
}

/// A recruiting event run by a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub id: DriveId,
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: EligibilityCriteria,
    pub package: Option<String>,
    pub location: Option<String>,
    pub drive_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: DriveStatus,
    pub eligible_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Per-drive application state tracked on the student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Eligible,
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Eligible => "eligible",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    const fn stage(self) -> u8 {
        match self {
            ApplicationStatus::Eligible => 0,
            ApplicationStatus::Applied => 1,
            ApplicationStatus::Shortlisted => 2,
            ApplicationStatus::Selected | ApplicationStatus::Rejected => 3,
        }
    }

    /// Application status only moves forward: eligible, then applied or
    /// shortlisted, then a terminal selected/rejected verdict.
    pub const fn can_advance_to(self, next: ApplicationStatus) -> bool {
        next.stage() > self.stage()
    }
}

/// Coarse ranking bucket assigned during shortlisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingTier {
    Best,
    Better,
    Average,
}

impl RankingTier {
    pub const fn label(self) -> &'static str {
        match self {
            RankingTier::Best => "Best",
            RankingTier::Better => "Better",
            RankingTier::Average => "Average",
        }
    }
}

/// One student's application record for one drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveApplication {
    pub drive_id: DriveId,
    pub status: ApplicationStatus,
    pub ranking: Option<RankingTier>,
}

impl DriveApplication {
    pub fn eligible(drive_id: DriveId) -> Self {
        Self {
            drive_id,
            status: ApplicationStatus::Eligible,
            ranking: None,
        }
    }
}
