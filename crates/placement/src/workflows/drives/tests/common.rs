use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::{Student, Usn};
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::drives::domain::{Drive, DriveId, EligibilityCriteria};
use crate::workflows::drives::repository::DriveRepository;
use crate::workflows::drives::service::{DriveService, NewDrive};
use crate::workflows::notifications::dispatcher::NotificationDispatcher;
use crate::workflows::notifications::domain::{Notification, NotificationId};
use crate::workflows::notifications::store::{NotificationKey, NotificationStore};

#[derive(Default)]
pub(super) struct MemoryStudents {
    records: Mutex<HashMap<Usn, Student>>,
}

impl StudentRepository for MemoryStudents {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&student.usn) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(student.usn.clone(), student.clone());
        Ok(student)
    }

    fn update(&self, student: Student) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&student.usn) {
            guard.insert(student.usn.clone(), student);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, usn: &Usn) -> Result<Option<Student>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(usn).cloned())
    }

    fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, usn: &Usn) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(usn).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryDrives {
    records: Mutex<HashMap<String, Drive>>,
}

impl DriveRepository for MemoryDrives {
    fn insert(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&drive.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.id.0.clone(), drive.clone());
        Ok(drive)
    }

    fn update(&self, drive: Drive) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&drive.id.0) {
            guard.insert(drive.id.0.clone(), drive);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<Drive>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &DriveId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    records: Mutex<Vec<Notification>>,
}

impl MemoryNotifications {
    pub(super) fn all(&self) -> Vec<Notification> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .clone()
    }
}

impl NotificationStore for MemoryNotifications {
    fn append(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.push(notification.clone());
        Ok(notification)
    }

    fn upsert(
        &self,
        key: &NotificationKey,
        mut notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if let Some(existing) = guard.iter_mut().find(|record| key.matches(record)) {
            notification.id = existing.id.clone();
            *existing = notification.clone();
            return Ok(notification);
        }
        guard.push(notification.clone());
        Ok(notification)
    }

    fn for_student(&self, usn: &Usn, limit: usize) -> Result<Vec<Notification>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut matching: Vec<Notification> = guard
            .iter()
            .filter(|record| &record.usn == usn)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    fn mark_read(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.is_read = true;
        Ok(())
    }

    fn mark_all_read(&self, usn: &Usn) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let mut flipped = 0;
        for record in guard.iter_mut().filter(|record| &record.usn == usn) {
            if !record.is_read {
                record.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

pub(super) type TestDriveService = DriveService<MemoryStudents, MemoryDrives, MemoryNotifications>;

pub(super) fn build_service() -> (
    Arc<TestDriveService>,
    Arc<MemoryStudents>,
    Arc<MemoryNotifications>,
) {
    let students = Arc::new(MemoryStudents::default());
    let drives = Arc::new(MemoryDrives::default());
    let store = Arc::new(MemoryNotifications::default());
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone()));
    let service = Arc::new(DriveService::new(students.clone(), drives, dispatcher));
    (service, students, store)
}

pub(super) fn student(usn: &str, cgpa: Option<f64>, backlogs: Option<u32>) -> Student {
    Student {
        name: format!("Student {usn}"),
        usn: Usn::new(usn),
        branch: "CSE".to_string(),
        year: Some(4),
        cgpa,
        backlogs,
        email: String::new(),
        phone: String::new(),
        assessment_scores: Vec::new(),
        drive_applications: Vec::new(),
        created_at: Utc::now(),
    }
}

pub(super) fn open_criteria(min_cgpa: f64) -> EligibilityCriteria {
    EligibilityCriteria {
        min_cgpa,
        max_backlogs: 0,
        eligible_branches: Vec::new(),
        eligible_years: Vec::new(),
    }
}

pub(super) fn new_drive(company: &str, min_cgpa: f64) -> NewDrive {
    NewDrive {
        company_name: company.to_string(),
        description: String::new(),
        criteria: open_criteria(min_cgpa),
        package: Some("10 LPA".to_string()),
        location: None,
        drive_date: None,
        deadline: None,
        status: None,
    }
}
