use crate::storage::RepositoryError;

use super::domain::{Drive, DriveId};

/// Storage abstraction over the drive registry.
pub trait DriveRepository: Send + Sync {
    fn insert(&self, drive: Drive) -> Result<Drive, RepositoryError>;

    fn update(&self, drive: Drive) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;

    fn list(&self) -> Result<Vec<Drive>, RepositoryError>;

    fn remove(&self, id: &DriveId) -> Result<(), RepositoryError>;
}
