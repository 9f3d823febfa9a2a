mod support;

use std::sync::Arc;

use chrono::Utc;
use placement::workflows::directory::{Student, StudentRepository, Usn};
use placement::workflows::drives::{
    ApplicationStatus, DriveService, EligibilityCriteria, NewDrive, RankingTier,
};
use placement::workflows::notifications::{NotificationCategory, NotificationDispatcher};

use support::{MemoryDrives, MemoryNotifications, MemoryStudents};

fn student(usn: &str, cgpa: f64) -> Student {
    Student {
        name: format!("Student {usn}"),
        usn: Usn::new(usn),
        branch: "CSE".to_string(),
        year: Some(4),
        cgpa: Some(cgpa),
        backlogs: Some(0),
        email: String::new(),
        phone: String::new(),
        assessment_scores: Vec::new(),
        drive_applications: Vec::new(),
        created_at: Utc::now(),
    }
}

fn build() -> (
    Arc<DriveService<MemoryStudents, MemoryDrives, MemoryNotifications>>,
    Arc<MemoryStudents>,
    Arc<MemoryNotifications>,
) {
    let students = Arc::new(MemoryStudents::default());
    let drives = Arc::new(MemoryDrives::default());
    let store = Arc::new(MemoryNotifications::default());
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone()));
    let service = Arc::new(DriveService::new(students.clone(), drives, dispatcher));
    (service, students, store)
}

#[test]
fn publish_then_shortlist_end_to_end_is_replay_safe() {
    let (service, students, store) = build();
    students.insert(student("1VV21CS001", 9.5)).expect("seed");
    students.insert(student("1VV21CS002", 7.5)).expect("seed");
    students.insert(student("1VV21CS003", 5.0)).expect("seed");

    let drive = service
        .create(NewDrive {
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
            status: None,
        })
        .expect("create drive");
    assert_eq!(drive.eligible_count, 2);

    // Publish twice: still one drive notice per eligible student.
    service.publish(&drive.id).expect("publish");
    service.publish(&drive.id).expect("republish");
    let drive_notices: Vec<_> = store
        .all()
        .into_iter()
        .filter(|record| record.category == NotificationCategory::Drive)
        .collect();
    assert_eq!(drive_notices.len(), 2);

    // Shortlist twice: same tiers both runs, one shortlist notice each.
    service.shortlist(&drive.id).expect("shortlist");
    service.shortlist(&drive.id).expect("reshortlist");

    let best = students
        .fetch(&Usn::new("1VV21CS001"))
        .expect("fetch")
        .expect("exists");
    let application = best
        .application_for(&drive.id)
        .expect("application recorded");
    assert_eq!(application.status, ApplicationStatus::Shortlisted);
    assert_eq!(application.ranking, Some(RankingTier::Best));

    let better = students
        .fetch(&Usn::new("1VV21CS002"))
        .expect("fetch")
        .expect("exists");
    assert_eq!(
        better.application_for(&drive.id).expect("application").ranking,
        Some(RankingTier::Better)
    );

    // The ineligible student never hears about the drive.
    let outsider = students
        .fetch(&Usn::new("1VV21CS003"))
        .expect("fetch")
        .expect("exists");
    assert!(outsider.drive_applications.is_empty());

    let shortlist_notices: Vec<_> = store
        .all()
        .into_iter()
        .filter(|record| record.category == NotificationCategory::Shortlist)
        .collect();
    assert_eq!(shortlist_notices.len(), 2);
    assert!(shortlist_notices
        .iter()
        .all(|record| record.usn != Usn::new("1VV21CS003")));
}

#[test]
fn shortlist_without_prior_publish_still_creates_applications() {
    let (service, students, _) = build();
    students.insert(student("1VV21CS001", 8.0)).expect("seed");

    let drive = service
        .create(NewDrive {
            company_name: "Quanta Labs".to_string(),
            description: String::new(),
            criteria: EligibilityCriteria {
                min_cgpa: 7.0,
                max_backlogs: 0,
                eligible_branches: Vec::new(),
                eligible_years: Vec::new(),
            },
            package: None,
            location: None,
            drive_date: None,
            deadline: None,
            status: None,
        })
        .expect("create drive");

    let outcome = service.shortlist(&drive.id).expect("shortlist");
    assert_eq!(outcome.shortlisted, 1);

    let candidate = students
        .fetch(&Usn::new("1VV21CS001"))
        .expect("fetch")
        .expect("exists");
    assert_eq!(candidate.drive_applications.len(), 1);
    assert_eq!(
        candidate.drive_applications[0].status,
        ApplicationStatus::Shortlisted
    );
}
