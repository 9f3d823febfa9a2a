use crate::storage::RepositoryError;

use super::domain::{Student, Usn};

/// Storage abstraction over the student directory.
pub trait StudentRepository: Send + Sync {
    /// Insert a new record; `Conflict` when the USN is already registered.
    fn insert(&self, student: Student) -> Result<Student, RepositoryError>;

    /// Replace the record matching the student's USN; `NotFound` when absent.
    fn update(&self, student: Student) -> Result<(), RepositoryError>;

    fn fetch(&self, usn: &Usn) -> Result<Option<Student>, RepositoryError>;

    fn list(&self) -> Result<Vec<Student>, RepositoryError>;

    fn remove(&self, usn: &Usn) -> Result<(), RepositoryError>;
}
