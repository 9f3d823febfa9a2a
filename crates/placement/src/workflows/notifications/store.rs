use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;

use super::domain::{Notification, NotificationCategory, NotificationId};

/// Dedupe key for upsert-style dispatch: repeated notifications for the same
/// event replace the earlier record instead of stacking up in the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationKey {
    pub usn: Usn,
    pub category: NotificationCategory,
    /// Case-insensitive substring matched against the stored title.
    pub title_pattern: String,
}

impl NotificationKey {
    pub fn matches(&self, notification: &Notification) -> bool {
        notification.usn == self.usn
            && notification.category == self.category
            && notification
                .title
                .to_lowercase()
                .contains(&self.title_pattern.to_lowercase())
    }
}

/// Storage abstraction for the notification inbox.
pub trait NotificationStore: Send + Sync {
    fn append(&self, notification: Notification) -> Result<Notification, RepositoryError>;

    /// Replace the first record matching `key`, keeping its identifier;
    /// append when no record matches.
    fn upsert(
        &self,
        key: &NotificationKey,
        notification: Notification,
    ) -> Result<Notification, RepositoryError>;

    /// Newest-first slice of a student's inbox.
    fn for_student(&self, usn: &Usn, limit: usize) -> Result<Vec<Notification>, RepositoryError>;

    fn mark_read(&self, id: &NotificationId) -> Result<(), RepositoryError>;

    /// Returns how many unread records were flipped.
    fn mark_all_read(&self, usn: &Usn) -> Result<usize, RepositoryError>;
}
