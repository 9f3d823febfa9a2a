use crate::storage::RepositoryError;
use crate::workflows::drives::domain::DriveId;

use super::domain::{InterviewSlot, SlotId};

/// Storage abstraction over booked interview slots.
pub trait SlotRepository: Send + Sync {
    fn insert(&self, slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError>;

    fn update(&self, slot: InterviewSlot) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError>;

    fn list(&self) -> Result<Vec<InterviewSlot>, RepositoryError>;

    fn list_for_drive(&self, drive_id: &DriveId) -> Result<Vec<InterviewSlot>, RepositoryError>;

    fn remove(&self, id: &SlotId) -> Result<(), RepositoryError>;
}
