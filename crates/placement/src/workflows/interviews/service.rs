use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::{Student, Usn};
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::drives::domain::{ApplicationStatus, DriveId};
use crate::workflows::drives::eligibility;
use crate::workflows::drives::repository::DriveRepository;
use crate::workflows::notifications::dispatcher::{NoticeRequest, NotificationDispatcher};
use crate::workflows::notifications::store::NotificationStore;

use super::domain::{hhmm, InterviewSlot, SlotId, SlotMode, SlotStatus};
use super::scheduler;

static SLOT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_slot_id() -> SlotId {
    let id = SLOT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SlotId(format!("slt-{id:06}"))
}

/// Payload accepted when an operator books a slot. Student and drive names
/// are resolved from their records, never taken from the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSlot {
    pub drive_id: DriveId,
    pub usn: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub mode: SlotMode,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an existing slot; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotUpdate {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    pub mode: Option<SlotMode>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<SlotStatus>,
}

mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| {
            NaiveTime::parse_from_str(&value, "%H:%M").map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// Outcome of a bulk notification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotifyOutcome {
    pub notified: usize,
}

/// Error raised by the interview scheduler.
#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error("drive not found")]
    DriveNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("slot not found")]
    SlotNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{student_name} already has a slot at {at}")]
    Overlap { student_name: String, at: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service booking interview slots and pushing schedule reminders through the
/// notification dispatcher.
pub struct InterviewService<P, S, D, N> {
    slots: Arc<P>,
    students: Arc<S>,
    drives: Arc<D>,
    dispatcher: Arc<NotificationDispatcher<N>>,
}

impl<P, S, D, N> InterviewService<P, S, D, N>
where
    P: super::repository::SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    pub fn new(
        slots: Arc<P>,
        students: Arc<S>,
        drives: Arc<D>,
        dispatcher: Arc<NotificationDispatcher<N>>,
    ) -> Self {
        Self {
            slots,
            students,
            drives,
            dispatcher,
        }
    }

    /// Book a slot, refusing a second booking for the same drive, day, and
    /// start time.
    pub fn create(&self, new: NewSlot) -> Result<InterviewSlot, InterviewError> {
        if new.end_time <= new.start_time {
            return Err(InterviewError::Validation(
                "end time must fall after start time".to_string(),
            ));
        }

        let drive = self
            .drives
            .fetch(&new.drive_id)?
            .ok_or(InterviewError::DriveNotFound)?;
        let usn = Usn::new(&new.usn);
        let student = self
            .students
            .fetch(&usn)?
            .ok_or(InterviewError::StudentNotFound)?;

        self.guard_overlap(&new.drive_id, new.date, new.start_time, None)?;

        let slot = InterviewSlot {
            id: next_slot_id(),
            drive_id: drive.id,
            drive_name: drive.company_name,
            usn: student.usn,
            student_name: student.name,
            student_email: student.email,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            mode: new.mode,
            location: new.location,
            notes: new.notes,
            status: SlotStatus::Scheduled,
            created_at: Utc::now(),
        };

        Ok(self.slots.insert(slot)?)
    }

    pub fn update(&self, id: &SlotId, update: SlotUpdate) -> Result<InterviewSlot, InterviewError> {
        let mut slot = self.fetch(id)?;

        let date = update.date.unwrap_or(slot.date);
        let start_time = update.start_time.unwrap_or(slot.start_time);
        if update.date.is_some() || update.start_time.is_some() {
            self.guard_overlap(&slot.drive_id, date, start_time, Some(id))?;
        }

        slot.date = date;
        slot.start_time = start_time;
        if let Some(end_time) = update.end_time {
            slot.end_time = end_time;
        }
        if slot.end_time <= slot.start_time {
            return Err(InterviewError::Validation(
                "end time must fall after start time".to_string(),
            ));
        }
        if let Some(mode) = update.mode {
            slot.mode = mode;
        }
        if let Some(location) = update.location {
            slot.location = Some(location);
        }
        if let Some(notes) = update.notes {
            slot.notes = Some(notes);
        }
        if let Some(status) = update.status {
            slot.status = status;
        }

        self.slots.update(slot.clone())?;
        Ok(slot)
    }

    pub fn fetch(&self, id: &SlotId) -> Result<InterviewSlot, InterviewError> {
        self.slots.fetch(id)?.ok_or(InterviewError::SlotNotFound)
    }

    pub fn remove(&self, id: &SlotId) -> Result<(), InterviewError> {
        self.slots.remove(id).map_err(|err| match err {
            RepositoryError::NotFound => InterviewError::SlotNotFound,
            other => InterviewError::Repository(other),
        })
    }

    /// All slots in panel order: by date, then start time.
    pub fn list(&self) -> Result<Vec<InterviewSlot>, InterviewError> {
        let mut slots = self.slots.list()?;
        slots.sort_by_key(|slot| (slot.date, slot.start_time));
        Ok(slots)
    }

    pub fn slots_for_drive(&self, drive_id: &DriveId) -> Result<Vec<InterviewSlot>, InterviewError> {
        let mut slots = self.slots.list_for_drive(drive_id)?;
        slots.sort_by_key(|slot| (slot.date, slot.start_time));
        Ok(slots)
    }

    /// Candidates to schedule for a drive: the formally shortlisted set, or
    /// the currently eligible set when no shortlist has been confirmed yet.
    pub fn candidates_for_drive(&self, drive_id: &DriveId) -> Result<Vec<Student>, InterviewError> {
        let drive = self
            .drives
            .fetch(drive_id)?
            .ok_or(InterviewError::DriveNotFound)?;

        let students = self.students.list()?;
        let shortlisted: Vec<Student> = students
            .iter()
            .filter(|student| {
                student
                    .application_for(drive_id)
                    .is_some_and(|application| {
                        application.status == ApplicationStatus::Shortlisted
                    })
            })
            .cloned()
            .collect();

        if !shortlisted.is_empty() {
            return Ok(shortlisted);
        }
        Ok(eligibility::eligible_set(students, &drive.criteria))
    }

    /// Push one schedule reminder; repeats update the existing inbox record.
    pub fn notify_slot(&self, id: &SlotId) -> Result<(), InterviewError> {
        let slot = self.fetch(id)?;
        let message = scheduler::notification_message(&slot);
        self.dispatcher.dispatch(NoticeRequest::interview_scheduled(
            &slot.usn,
            &slot.drive_id,
            &slot.drive_name,
            message,
        ))?;
        Ok(())
    }

    /// Remind every student still scheduled for the drive.
    pub fn notify_drive(&self, drive_id: &DriveId) -> Result<NotifyOutcome, InterviewError> {
        let slots = self.slots.list_for_drive(drive_id)?;

        let mut notified = 0;
        for slot in slots
            .into_iter()
            .filter(|slot| slot.status == SlotStatus::Scheduled)
        {
            let message = scheduler::bulk_notification_message(&slot);
            self.dispatcher.dispatch(NoticeRequest::interview_scheduled(
                &slot.usn,
                &slot.drive_id,
                &slot.drive_name,
                message,
            ))?;
            notified += 1;
        }

        Ok(NotifyOutcome { notified })
    }

    fn guard_overlap(
        &self,
        drive_id: &DriveId,
        date: NaiveDate,
        start_time: NaiveTime,
        exclude: Option<&SlotId>,
    ) -> Result<(), InterviewError> {
        let slots = self.slots.list_for_drive(drive_id)?;
        let collision = slots.iter().find(|slot| {
            exclude != Some(&slot.id) && slot.collides_with(drive_id, date, start_time)
        });

        match collision {
            Some(taken) => Err(InterviewError::Overlap {
                student_name: taken.student_name.clone(),
                at: scheduler::format_time_12h(start_time),
            }),
            None => Ok(()),
        }
    }
}
