use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;

use super::domain::{Assessment, AssessmentAttempt, AssessmentId, AttemptId};

/// Storage abstraction over published assessments.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError>;

    fn remove(&self, id: &AssessmentId) -> Result<(), RepositoryError>;
}

/// Storage abstraction over attempts. At most one attempt exists per
/// (assessment, student) pair; `find` is the idempotency lookup.
pub trait AttemptRepository: Send + Sync {
    fn insert(&self, attempt: AssessmentAttempt) -> Result<AssessmentAttempt, RepositoryError>;

    fn update(&self, attempt: AssessmentAttempt) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &AttemptId) -> Result<Option<AssessmentAttempt>, RepositoryError>;

    fn find(
        &self,
        assessment_id: &AssessmentId,
        usn: &Usn,
    ) -> Result<Option<AssessmentAttempt>, RepositoryError>;

    fn list_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<AssessmentAttempt>, RepositoryError>;
}
