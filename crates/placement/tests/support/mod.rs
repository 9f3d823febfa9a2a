#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use placement::storage::RepositoryError;
use placement::workflows::assessments::{
    Assessment, AssessmentAttempt, AssessmentId, AssessmentRepository, AttemptId,
    AttemptRepository,
};
use placement::workflows::directory::{Student, StudentRepository, Usn};
use placement::workflows::drives::{Drive, DriveId, DriveRepository};
use placement::workflows::notifications::{
    Notification, NotificationId, NotificationKey, NotificationStore,
};

#[derive(Default)]
pub struct MemoryStudents {
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
pub struct MemoryDrives {
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
pub struct MemoryAssessments {
    records: Mutex<HashMap<String, Assessment>>,
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.0.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id.0) {
            guard.insert(assessment.id.0.clone(), assessment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryAttempts {
    records: Mutex<HashMap<String, AssessmentAttempt>>,
}

impl AttemptRepository for MemoryAttempts {
    fn insert(&self, attempt: AssessmentAttempt) -> Result<AssessmentAttempt, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&attempt.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(attempt.id.0.clone(), attempt.clone());
        Ok(attempt)
    }

    fn update(&self, attempt: AssessmentAttempt) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&attempt.id.0) {
            guard.insert(attempt.id.0.clone(), attempt);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AttemptId) -> Result<Option<AssessmentAttempt>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn find(
        &self,
        assessment_id: &AssessmentId,
        usn: &Usn,
    ) -> Result<Option<AssessmentAttempt>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|attempt| &attempt.assessment_id == assessment_id && &attempt.usn == usn)
            .cloned())
    }

    fn list_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<AssessmentAttempt>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|attempt| &attempt.assessment_id == assessment_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryNotifications {
    records: Mutex<Vec<Notification>>,
}

impl MemoryNotifications {
    pub fn all(&self) -> Vec<Notification> {
        self.records.lock().expect("store mutex poisoned").clone()
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
