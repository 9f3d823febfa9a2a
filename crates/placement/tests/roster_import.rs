mod support;

use std::io::Cursor;
use std::sync::Arc;

use placement::workflows::directory::{DirectoryService, StudentRepository, Usn};

use support::MemoryStudents;

fn build() -> (Arc<DirectoryService<MemoryStudents>>, Arc<MemoryStudents>) {
    let students = Arc::new(MemoryStudents::default());
    (Arc::new(DirectoryService::new(students.clone())), students)
}

#[test]
fn roster_rows_upsert_by_usn_with_sensible_defaults() {
    let (service, students) = build();

    let csv = "\
Name,USN,Branch,CGPA,Email
Asha Rao,1vv21cs001,CSE,8.7,asha@example.edu
Ravi Kumar,1vv21is002,ISE,7.2,
";
    let summary = service.import_roster(Cursor::new(csv)).expect("import");
    assert_eq!(summary.added, 2);
    assert_eq!(summary.skipped, 0);

    let asha = students
        .fetch(&Usn::new("1VV21CS001"))
        .expect("fetch")
        .expect("exists");
    assert_eq!(asha.name, "Asha Rao");
    assert_eq!(asha.year, Some(4));
    assert_eq!(asha.backlogs, Some(0));
    assert_eq!(asha.cgpa, Some(8.7));

    // Second pass with refreshed academics updates in place.
    let csv = "\
Name,USN,Branch,CGPA,Backlogs
Asha Rao,1VV21CS001,CSE,9.1,1
";
    let summary = service.import_roster(Cursor::new(csv)).expect("reimport");
    assert_eq!(summary.added, 1);

    let asha = students
        .fetch(&Usn::new("1VV21CS001"))
        .expect("fetch")
        .expect("exists");
    assert_eq!(asha.cgpa, Some(9.1));
    assert_eq!(asha.backlogs, Some(1));
    assert_eq!(students.list().expect("list").len(), 2);
}

#[test]
fn rows_missing_identity_fields_are_skipped_not_fatal() {
    let (service, students) = build();

    let csv = "\
Name,USN,Branch
Asha Rao,1vv21cs001,CSE
,1vv21cs002,CSE
Ravi Kumar,,ISE
";
    let summary = service.import_roster(Cursor::new(csv)).expect("import");
    assert_eq!(summary.added, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(students.list().expect("list").len(), 1);
}

#[test]
fn lowercase_headers_and_unparseable_numbers_are_tolerated() {
    let (service, students) = build();

    let csv = "\
name,usn,branch,cgpa,year
Asha Rao,1vv21cs001,CSE,not-a-number,3
";
    let summary = service.import_roster(Cursor::new(csv)).expect("import");
    assert_eq!(summary.added, 1);

    let asha = students
        .fetch(&Usn::new("1VV21CS001"))
        .expect("fetch")
        .expect("exists");
    assert_eq!(asha.cgpa, None);
    assert_eq!(asha.year, Some(3));
}
