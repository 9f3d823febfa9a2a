//! Assessments: the question catalog, the grader, and the proctored attempt
//! state machine.

pub mod domain;
pub mod grader;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Assessment, AssessmentAttempt, AssessmentId, AssessmentScore, AttemptId, AttemptStatus,
    MalpracticeEvent, NewAssessment, Question, WarningOutcome, WARNING_LIMIT,
};
pub use grader::{grade, GradeResult};
pub use repository::{AssessmentRepository, AttemptRepository};
pub use router::assessment_router;
pub use service::{
    AssessmentError, AssessmentService, AttemptStart, SubmissionOutcome, TakeQuestion, TakeView,
};
