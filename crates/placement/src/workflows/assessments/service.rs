use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;
use crate::workflows::directory::repository::StudentRepository;

use super::domain::{
    Assessment, AssessmentAttempt, AssessmentId, AssessmentScore, AttemptId, AttemptStatus,
    NewAssessment, Question, WarningOutcome,
};
use super::grader;
use super::repository::{AssessmentRepository, AttemptRepository};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ATTEMPT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

fn next_attempt_id() -> AttemptId {
    let id = ATTEMPT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttemptId(format!("att-{id:06}"))
}

/// Question as served to a student taking the test: the correct option index
/// never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub marks: u32,
    pub topic: Option<String>,
}

/// Assessment view served to the taking page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeView {
    pub id: AssessmentId,
    pub title: String,
    pub kind: String,
    pub time_limit_minutes: u32,
    pub total_marks: u32,
    pub questions: Vec<TakeQuestion>,
}

/// Outcome of starting an attempt: a fresh record, or the live one resumed.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptStart {
    Started(AssessmentAttempt),
    Resumed(AssessmentAttempt),
}

impl AttemptStart {
    pub fn attempt(&self) -> &AssessmentAttempt {
        match self {
            AttemptStart::Started(attempt) | AttemptStart::Resumed(attempt) => attempt,
        }
    }

    pub const fn resumed(&self) -> bool {
        matches!(self, AttemptStart::Resumed(_))
    }
}

/// Outcome of a submission; `changed: false` marks an idempotent replay of a
/// sheet that was already graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub changed: bool,
}

/// Error raised by assessment operations.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("assessment not found")]
    AssessmentNotFound,
    #[error("attempt not found")]
    AttemptNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("attempt already completed: {0}")]
    AlreadyCompleted(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service owning the assessment catalog, the grader, and the attempt
/// state machine.
pub struct AssessmentService<A, T, S> {
    assessments: Arc<A>,
    attempts: Arc<T>,
    students: Arc<S>,
}

impl<A, T, S> AssessmentService<A, T, S>
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    pub fn new(assessments: Arc<A>, attempts: Arc<T>, students: Arc<S>) -> Self {
        Self {
            assessments,
            attempts,
            students,
        }
    }

    pub fn create(&self, new: NewAssessment) -> Result<Assessment, AssessmentError> {
        if new.title.trim().is_empty() {
            return Err(AssessmentError::Validation("title is required".to_string()));
        }
        if new.questions.is_empty() {
            return Err(AssessmentError::Validation(
                "at least one question is required".to_string(),
            ));
        }
        for (index, question) in new.questions.iter().enumerate() {
            if question.correct_answer >= question.options.len() {
                return Err(AssessmentError::Validation(format!(
                    "question {index}: correct answer index {} out of range",
                    question.correct_answer
                )));
            }
        }

        let total_marks = new.questions.iter().map(|question| question.marks).sum();
        let assessment = Assessment {
            id: next_assessment_id(),
            title: new.title.trim().to_string(),
            kind: new.kind,
            drive_id: new.drive_id,
            questions: new.questions,
            time_limit_minutes: new.time_limit_minutes,
            total_marks,
            is_active: true,
            created_at: Utc::now(),
        };

        Ok(self.assessments.insert(assessment)?)
    }

    pub fn fetch(&self, id: &AssessmentId) -> Result<Assessment, AssessmentError> {
        self.assessments
            .fetch(id)?
            .ok_or(AssessmentError::AssessmentNotFound)
    }

    /// Catalog newest first.
    pub fn list(&self) -> Result<Vec<Assessment>, AssessmentError> {
        let mut assessments = self.assessments.list()?;
        assessments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assessments)
    }

    pub fn toggle_active(&self, id: &AssessmentId) -> Result<Assessment, AssessmentError> {
        let mut assessment = self.fetch(id)?;
        assessment.is_active = !assessment.is_active;
        self.assessments.update(assessment.clone())?;
        Ok(assessment)
    }

    pub fn remove(&self, id: &AssessmentId) -> Result<(), AssessmentError> {
        self.assessments.remove(id).map_err(|err| match err {
            RepositoryError::NotFound => AssessmentError::AssessmentNotFound,
            other => AssessmentError::Repository(other),
        })
    }

    /// Sanitized view for the taking page. Inactive assessments are invisible
    /// to students.
    pub fn take_view(&self, id: &AssessmentId) -> Result<TakeView, AssessmentError> {
        let assessment = self.fetch(id)?;
        if !assessment.is_active {
            return Err(AssessmentError::AssessmentNotFound);
        }

        Ok(TakeView {
            id: assessment.id,
            title: assessment.title,
            kind: assessment.kind,
            time_limit_minutes: assessment.time_limit_minutes,
            total_marks: assessment.total_marks,
            questions: assessment
                .questions
                .into_iter()
                .map(sanitize_question)
                .collect(),
        })
    }

    /// Begin or resume the student's attempt. A terminal attempt can never be
    /// restarted.
    pub fn start_attempt(
        &self,
        id: &AssessmentId,
        usn: &Usn,
    ) -> Result<AttemptStart, AssessmentError> {
        let assessment = self.fetch(id)?;
        if !assessment.is_active {
            return Err(AssessmentError::AssessmentNotFound);
        }
        let student = self
            .students
            .fetch(usn)?
            .ok_or(AssessmentError::StudentNotFound)?;

        if let Some(existing) = self.attempts.find(id, usn)? {
            if existing.status.is_terminal() {
                return Err(AssessmentError::AlreadyCompleted(
                    existing.status.label().to_string(),
                ));
            }
            return Ok(AttemptStart::Resumed(existing));
        }

        let attempt = AssessmentAttempt::begin(
            next_attempt_id(),
            assessment.id,
            student.usn,
            student.name,
        );
        Ok(AttemptStart::Started(self.attempts.insert(attempt)?))
    }

    /// Register one proctoring warning against a live attempt.
    pub fn record_warning(
        &self,
        attempt_id: &AttemptId,
        event: &str,
    ) -> Result<(WarningOutcome, AssessmentAttempt), AssessmentError> {
        let mut attempt = self
            .attempts
            .fetch(attempt_id)?
            .ok_or(AssessmentError::AttemptNotFound)?;

        let outcome = attempt.register_warning(event, Utc::now());
        if !matches!(outcome, WarningOutcome::Ignored) {
            self.attempts.update(attempt.clone())?;
        }
        Ok((outcome, attempt))
    }

    /// Grade and close an attempt. Resubmitting a graded sheet replays the
    /// stored result without appending a second score to the student profile;
    /// a malpractice-flagged attempt can never be submitted.
    pub fn submit(
        &self,
        attempt_id: &AttemptId,
        answers: HashMap<usize, String>,
    ) -> Result<SubmissionOutcome, AssessmentError> {
        let mut attempt = self
            .attempts
            .fetch(attempt_id)?
            .ok_or(AssessmentError::AttemptNotFound)?;

        match attempt.status {
            AttemptStatus::Malpractice => {
                return Err(AssessmentError::AlreadyCompleted(
                    "flagged for malpractice".to_string(),
                ));
            }
            AttemptStatus::Submitted => {
                let score = attempt.score.unwrap_or(0);
                let max_score = attempt.max_score.unwrap_or(0);
                let percentage = if max_score == 0 {
                    0
                } else {
                    ((score as f64 / max_score as f64) * 100.0).round() as u32
                };
                return Ok(SubmissionOutcome {
                    score,
                    max_score,
                    percentage,
                    changed: false,
                });
            }
            AttemptStatus::InProgress => {}
        }

        let assessment = self.fetch(&attempt.assessment_id)?;
        let result = grader::grade(&assessment.questions, &answers);

        let submitted_at = Utc::now();
        attempt.status = AttemptStatus::Submitted;
        attempt.submitted_at = Some(submitted_at);
        attempt.answers = answers;
        attempt.score = Some(result.score);
        attempt.max_score = Some(result.total_marks);
        self.attempts.update(attempt.clone())?;

        let mut student = self
            .students
            .fetch(&attempt.usn)?
            .ok_or(AssessmentError::StudentNotFound)?;
        if student.record_assessment_score(AssessmentScore {
            assessment_id: assessment.id,
            score: result.score,
            max_score: result.total_marks,
            submitted_at,
        }) {
            self.students.update(student)?;
        }

        Ok(SubmissionOutcome {
            score: result.score,
            max_score: result.total_marks,
            percentage: result.percentage,
            changed: true,
        })
    }

    /// Operator view of everyone's attempts at one assessment.
    pub fn attempts_for(
        &self,
        id: &AssessmentId,
    ) -> Result<Vec<AssessmentAttempt>, AssessmentError> {
        self.fetch(id)?;
        let mut attempts = self.attempts.list_for_assessment(id)?;
        attempts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(attempts)
    }
}

fn sanitize_question(question: Question) -> TakeQuestion {
    TakeQuestion {
        question: question.question,
        options: question.options,
        marks: question.marks,
        topic: question.topic,
    }
}
