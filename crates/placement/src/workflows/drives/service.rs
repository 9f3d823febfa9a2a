use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::notifications::dispatcher::{NoticeRequest, NotificationDispatcher};
use crate::workflows::notifications::store::NotificationStore;

use super::domain::{
    ApplicationStatus, Drive, DriveId, DriveStatus, EligibilityCriteria,
};
use super::eligibility::{self, EligibilityVerdict};
use super::ranking;
use super::repository::DriveRepository;

static DRIVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_drive_id() -> DriveId {
    let id = DRIVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DriveId(format!("drv-{id:06}"))
}

/// Payload accepted when an operator creates a drive.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDrive {
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: EligibilityCriteria,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub drive_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<DriveStatus>,
}

/// Partial update applied to an existing drive; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveUpdate {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub criteria: Option<EligibilityCriteria>,
    pub package: Option<String>,
    pub location: Option<String>,
    pub drive_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<DriveStatus>,
}

/// Outcome of publishing a drive to its eligible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub notified: usize,
}

/// Outcome of a shortlist run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortlistOutcome {
    pub shortlisted: usize,
}

/// Result of an application-status update; `changed: false` signals an
/// idempotent replay rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub changed: bool,
    pub status: ApplicationStatus,
}

/// A drive annotated with one student's eligibility verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveEligibilityView {
    #[serde(flatten)]
    pub drive: Drive,
    pub is_eligible: bool,
    pub ineligible_reasons: Vec<String>,
}

/// Error raised by the drive service.
#[derive(Debug, thiserror::Error)]
pub enum DriveServiceError {
    #[error("drive not found")]
    DriveNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("application status cannot move from {from} back to {to}")]
    StatusRegression {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service composing the eligibility evaluator, ranking engine, and
/// notification dispatcher over the drive registry.
pub struct DriveService<S, D, N> {
    students: Arc<S>,
    drives: Arc<D>,
    dispatcher: Arc<NotificationDispatcher<N>>,
}

impl<S, D, N> DriveService<S, D, N>
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    pub fn new(students: Arc<S>, drives: Arc<D>, dispatcher: Arc<NotificationDispatcher<N>>) -> Self {
        Self {
            students,
            drives,
            dispatcher,
        }
    }

    pub fn create(&self, new: NewDrive) -> Result<Drive, DriveServiceError> {
        if new.company_name.trim().is_empty() {
            return Err(DriveServiceError::Validation(
                "company name is required".to_string(),
            ));
        }
        if !(0.0..=10.0).contains(&new.criteria.min_cgpa) {
            return Err(DriveServiceError::Validation(
                "min_cgpa must lie between 0 and 10".to_string(),
            ));
        }

        let eligible_count = self.eligible_students(&new.criteria)?.len();

        let drive = Drive {
            id: next_drive_id(),
            company_name: new.company_name.trim().to_string(),
            description: new.description,
            criteria: new.criteria,
            package: new.package,
            location: new.location,
            drive_date: new.drive_date,
            deadline: new.deadline,
            status: new.status.unwrap_or(DriveStatus::Upcoming),
            eligible_count,
            created_at: Utc::now(),
        };

        Ok(self.drives.insert(drive)?)
    }

    pub fn fetch(&self, id: &DriveId) -> Result<Drive, DriveServiceError> {
        self.drives
            .fetch(id)?
            .ok_or(DriveServiceError::DriveNotFound)
    }

    /// Drives newest first, matching the operator dashboard ordering.
    pub fn list(&self) -> Result<Vec<Drive>, DriveServiceError> {
        let mut drives = self.drives.list()?;
        drives.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(drives)
    }

    pub fn update(&self, id: &DriveId, update: DriveUpdate) -> Result<Drive, DriveServiceError> {
        let mut drive = self.fetch(id)?;

        if let Some(company_name) = update.company_name {
            drive.company_name = company_name;
        }
        if let Some(description) = update.description {
            drive.description = description;
        }
        if let Some(criteria) = update.criteria {
            drive.criteria = criteria;
            drive.eligible_count = self.eligible_students(&drive.criteria)?.len();
        }
        if let Some(package) = update.package {
            drive.package = Some(package);
        }
        if let Some(location) = update.location {
            drive.location = Some(location);
        }
        if let Some(drive_date) = update.drive_date {
            drive.drive_date = Some(drive_date);
        }
        if let Some(deadline) = update.deadline {
            drive.deadline = Some(deadline);
        }
        if let Some(status) = update.status {
            drive.status = status;
        }

        self.drives.update(drive.clone())?;
        Ok(drive)
    }

    pub fn remove(&self, id: &DriveId) -> Result<(), DriveServiceError> {
        self.drives.remove(id).map_err(|err| match err {
            RepositoryError::NotFound => DriveServiceError::DriveNotFound,
            other => DriveServiceError::Repository(other),
        })
    }

    /// Announce the drive to every eligible student: one upserted notification
    /// plus exactly one `eligible` application record each. Safe to replay.
    pub fn publish(&self, id: &DriveId) -> Result<PublishOutcome, DriveServiceError> {
        let drive = self.fetch(id)?;
        let eligible = self.eligible_students(&drive.criteria)?;

        let mut notified = 0;
        for mut student in eligible {
            self.dispatcher
                .dispatch(NoticeRequest::drive_published(&student.usn, &drive))?;
            if student.ensure_application(&drive.id) {
                self.students.update(student)?;
            }
            notified += 1;
        }

        Ok(PublishOutcome { notified })
    }

    /// Rank the eligible set, persist tier + shortlisted status on each
    /// application record, and notify each student once. Replays produce the
    /// same tiers and never a second notification.
    pub fn shortlist(&self, id: &DriveId) -> Result<ShortlistOutcome, DriveServiceError> {
        let drive = self.fetch(id)?;
        let eligible = self.eligible_students(&drive.criteria)?;
        let ranked = ranking::rank(&eligible);

        for (mut student, candidate) in eligible.into_iter().zip(ranked.iter()) {
            student.ensure_application(&drive.id);
            if let Some(application) = student.application_for_mut(&drive.id) {
                application.ranking = Some(candidate.tier);
                if application
                    .status
                    .can_advance_to(ApplicationStatus::Shortlisted)
                {
                    application.status = ApplicationStatus::Shortlisted;
                }
            }
            self.students.update(student)?;

            self.dispatcher.dispatch(NoticeRequest::shortlisted(
                &candidate.usn,
                &drive,
                candidate.tier,
            ))?;
        }

        Ok(ShortlistOutcome {
            shortlisted: ranked.len(),
        })
    }

    /// Open drives the student can still apply to.
    pub fn open_drives_for(&self, usn: &Usn) -> Result<Vec<Drive>, DriveServiceError> {
        let student = self
            .students
            .fetch(usn)?
            .ok_or(DriveServiceError::StudentNotFound)?;

        Ok(self
            .list()?
            .into_iter()
            .filter(|drive| drive.status.is_open())
            .filter(|drive| eligibility::evaluate(&student, &drive.criteria).eligible)
            .collect())
    }

    /// Every drive annotated with the student's verdict, so the dashboard can
    /// show the full gap for ineligible ones.
    pub fn drives_with_eligibility(
        &self,
        usn: &Usn,
    ) -> Result<Vec<DriveEligibilityView>, DriveServiceError> {
        let student = self
            .students
            .fetch(usn)?
            .ok_or(DriveServiceError::StudentNotFound)?;

        Ok(self
            .list()?
            .into_iter()
            .map(|drive| {
                let EligibilityVerdict { eligible, reasons } =
                    eligibility::evaluate(&student, &drive.criteria);
                DriveEligibilityView {
                    drive,
                    is_eligible: eligible,
                    ineligible_reasons: reasons,
                }
            })
            .collect())
    }

    /// Move a student's application forward. Replaying the current status is
    /// a no-op; moving backwards is rejected.
    pub fn set_application_status(
        &self,
        id: &DriveId,
        usn: &Usn,
        status: ApplicationStatus,
    ) -> Result<StatusChange, DriveServiceError> {
        let drive = self.fetch(id)?;
        let mut student = self
            .students
            .fetch(usn)?
            .ok_or(DriveServiceError::StudentNotFound)?;

        student.ensure_application(&drive.id);
        let application = student
            .application_for_mut(&drive.id)
            .ok_or(DriveServiceError::StudentNotFound)?;

        if application.status == status {
            return Ok(StatusChange {
                changed: false,
                status,
            });
        }

        if !application.status.can_advance_to(status) {
            return Err(DriveServiceError::StatusRegression {
                from: application.status.label(),
                to: status.label(),
            });
        }

        application.status = status;
        self.students.update(student)?;
        Ok(StatusChange {
            changed: true,
            status,
        })
    }

    fn eligible_students(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<crate::workflows::directory::domain::Student>, DriveServiceError> {
        let mut students = self.students.list()?;
        // Stable ordering keeps shortlist runs deterministic.
        students.sort_by(|a, b| a.usn.0.cmp(&b.usn.0));
        Ok(eligibility::eligible_set(students, criteria))
    }
}
