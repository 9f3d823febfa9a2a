use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;
use crate::workflows::drives::domain::{Drive, DriveId, RankingTier};

use super::domain::{Notification, NotificationCategory, NotificationId};
use super::store::{NotificationKey, NotificationStore};

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

/// One pending notification plus its optional dedupe pattern.
#[derive(Debug, Clone)]
pub struct NoticeRequest {
    pub usn: Usn,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub drive_id: Option<DriveId>,
    /// When set, dispatch upserts by (usn, category, pattern) instead of appending.
    pub dedupe_pattern: Option<String>,
}

impl NoticeRequest {
    /// Announcement sent to every eligible student when a drive is published.
    pub fn drive_published(usn: &Usn, drive: &Drive) -> Self {
        let package = drive
            .package
            .clone()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "TBD".to_string());
        Self {
            usn: usn.clone(),
            title: format!("New Drive: {}", drive.company_name),
            message: format!(
                "You are eligible for {}! Min CGPA: {}, Package: {}. Check it out!",
                drive.company_name, drive.criteria.min_cgpa, package
            ),
            category: NotificationCategory::Drive,
            drive_id: Some(drive.id.clone()),
            dedupe_pattern: Some(drive.company_name.clone()),
        }
    }

    /// Sent once per student when the ranking engine shortlists them.
    pub fn shortlisted(usn: &Usn, drive: &Drive, tier: RankingTier) -> Self {
        Self {
            usn: usn.clone(),
            title: format!("Shortlisted: {}", drive.company_name),
            message: format!(
                "You've been shortlisted for {}! Ranking: {}",
                drive.company_name,
                tier.label()
            ),
            category: NotificationCategory::Shortlist,
            drive_id: Some(drive.id.clone()),
            dedupe_pattern: Some(drive.company_name.clone()),
        }
    }

    /// Interview slot reminder; repeated notifies update the same record.
    pub fn interview_scheduled(
        usn: &Usn,
        drive_id: &DriveId,
        drive_name: &str,
        message: String,
    ) -> Self {
        Self {
            usn: usn.clone(),
            title: format!("Interview Scheduled: {drive_name}"),
            message,
            category: NotificationCategory::General,
            drive_id: Some(drive_id.clone()),
            dedupe_pattern: Some(drive_name.to_string()),
        }
    }
}

/// Persists notification records and serves the student inbox.
pub struct NotificationDispatcher<N> {
    store: Arc<N>,
}

/// Inbox page size matching the dashboard widget.
const FEED_LIMIT: usize = 20;

impl<N> NotificationDispatcher<N>
where
    N: NotificationStore + 'static,
{
    pub fn new(store: Arc<N>) -> Self {
        Self { store }
    }

    pub fn dispatch(&self, request: NoticeRequest) -> Result<Notification, RepositoryError> {
        let notification = Notification {
            id: next_notification_id(),
            usn: request.usn.clone(),
            title: request.title,
            message: request.message,
            category: request.category,
            drive_id: request.drive_id,
            is_read: false,
            created_at: Utc::now(),
        };

        match request.dedupe_pattern {
            Some(pattern) => {
                let key = NotificationKey {
                    usn: request.usn,
                    category: notification.category,
                    title_pattern: pattern,
                };
                self.store.upsert(&key, notification)
            }
            None => self.store.append(notification),
        }
    }

    pub fn dispatch_all(
        &self,
        requests: Vec<NoticeRequest>,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut dispatched = Vec::with_capacity(requests.len());
        for request in requests {
            dispatched.push(self.dispatch(request)?);
        }
        Ok(dispatched)
    }

    pub fn feed(&self, usn: &Usn) -> Result<Vec<Notification>, RepositoryError> {
        self.store.for_student(usn, FEED_LIMIT)
    }

    pub fn mark_read(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        self.store.mark_read(id)
    }

    pub fn mark_all_read(&self, usn: &Usn) -> Result<usize, RepositoryError> {
        self.store.mark_all_read(usn)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::workflows::drives::domain::{Drive, DriveStatus, EligibilityCriteria};

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<Notification>>,
    }

    impl NotificationStore for MemoryStore {
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

        fn for_student(
            &self,
            usn: &Usn,
            limit: usize,
        ) -> Result<Vec<Notification>, RepositoryError> {
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

    fn sample_drive() -> Drive {
        Drive {
            id: DriveId("drv-000001".to_string()),
            company_name: "Innova Systems".to_string(),
            description: String::new(),
            criteria: EligibilityCriteria {
                min_cgpa: 7.0,
                max_backlogs: 0,
                eligible_branches: Vec::new(),
                eligible_years: Vec::new(),
            },
            package: Some("12 LPA".to_string()),
            location: None,
            drive_date: None,
            deadline: None,
            status: DriveStatus::Upcoming,
            eligible_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn drive_announcements_do_not_stack_on_replay() {
        let store = Arc::new(MemoryStore::default());
        let dispatcher = NotificationDispatcher::new(store.clone());
        let usn = Usn::new("1vv21cs001");
        let drive = sample_drive();

        dispatcher
            .dispatch(NoticeRequest::drive_published(&usn, &drive))
            .expect("first dispatch");
        dispatcher
            .dispatch(NoticeRequest::drive_published(&usn, &drive))
            .expect("replayed dispatch");

        let feed = dispatcher.feed(&usn).expect("feed");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "New Drive: Innova Systems");
    }

    #[test]
    fn shortlist_notice_names_the_tier() {
        let store = Arc::new(MemoryStore::default());
        let dispatcher = NotificationDispatcher::new(store);
        let usn = Usn::new("1vv21cs002");
        let drive = sample_drive();

        let notice = dispatcher
            .dispatch(NoticeRequest::shortlisted(&usn, &drive, RankingTier::Best))
            .expect("dispatch");

        assert_eq!(
            notice.message,
            "You've been shortlisted for Innova Systems! Ranking: Best"
        );
        assert!(!notice.is_read);
    }

    #[test]
    fn mark_all_read_reports_flipped_count() {
        let store = Arc::new(MemoryStore::default());
        let dispatcher = NotificationDispatcher::new(store);
        let usn = Usn::new("1vv21cs003");
        let drive = sample_drive();

        dispatcher
            .dispatch(NoticeRequest::drive_published(&usn, &drive))
            .expect("dispatch");
        dispatcher
            .dispatch(NoticeRequest::shortlisted(&usn, &drive, RankingTier::Average))
            .expect("dispatch");

        assert_eq!(dispatcher.mark_all_read(&usn).expect("mark all"), 2);
        assert_eq!(dispatcher.mark_all_read(&usn).expect("idempotent"), 0);
    }
}
