use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::storage::RepositoryError;
use crate::workflows::assessments::domain::{
    Assessment, AssessmentAttempt, AssessmentId, AttemptId, NewAssessment, Question,
};
use crate::workflows::assessments::repository::{AssessmentRepository, AttemptRepository};
use crate::workflows::assessments::service::AssessmentService;
use crate::workflows::directory::domain::{Student, Usn};
use crate::workflows::directory::repository::StudentRepository;

#[derive(Default)]
pub(super) struct MemoryAssessments {
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
pub(super) struct MemoryAttempts {
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

pub(super) type TestAssessmentService =
    AssessmentService<MemoryAssessments, MemoryAttempts, MemoryStudents>;

pub(super) fn build_service() -> (Arc<TestAssessmentService>, Arc<MemoryStudents>) {
    let assessments = Arc::new(MemoryAssessments::default());
    let attempts = Arc::new(MemoryAttempts::default());
    let students = Arc::new(MemoryStudents::default());
    let service = Arc::new(AssessmentService::new(assessments, attempts, students.clone()));
    (service, students)
}

pub(super) fn seed_student(students: &MemoryStudents, usn: &str) -> Usn {
    let usn = Usn::new(usn);
    students
        .insert(Student {
            name: format!("Student {}", usn.0),
            usn: usn.clone(),
            branch: "CSE".to_string(),
            year: Some(4),
            cgpa: Some(8.0),
            backlogs: Some(0),
            email: String::new(),
            phone: String::new(),
            assessment_scores: Vec::new(),
            drive_applications: Vec::new(),
            created_at: Utc::now(),
        })
        .expect("seed student");
    usn
}

pub(super) fn question(prompt: &str, correct: usize, marks: u32) -> Question {
    Question {
        question: prompt.to_string(),
        options: vec![
            "Option A".to_string(),
            "Option B".to_string(),
            "Option C".to_string(),
            "Option D".to_string(),
        ],
        correct_answer: correct,
        marks,
        topic: None,
    }
}

pub(super) fn new_assessment(title: &str, questions: Vec<Question>) -> NewAssessment {
    NewAssessment {
        title: title.to_string(),
        kind: "Aptitude".to_string(),
        drive_id: None,
        questions,
        time_limit_minutes: 30,
    }
}
