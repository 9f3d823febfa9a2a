use crate::infra::{
    InMemoryAssessmentRepository, InMemoryAttemptRepository, InMemoryDriveRepository,
    InMemoryNotificationStore, InMemorySlotRepository, InMemoryStudentRepository,
};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use placement::error::AppError;
use placement::workflows::assessments::{AssessmentService, NewAssessment, Question};
use placement::workflows::directory::{DirectoryService, Usn};
use placement::workflows::drives::{DriveService, EligibilityCriteria, NewDrive};
use placement::workflows::interviews::{calendar_link, InterviewService, NewSlot, SlotMode};
use placement::workflows::notifications::NotificationDispatcher;
use placement::workflows::reporting::DashboardStats;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

const DEMO_ROSTER: &str = "\
Name,USN,Branch,CGPA,Backlogs,Email
Asha Rao,1VV21CS001,CSE,9.2,0,asha@campus.edu
Ravi Kumar,1VV21CS002,CSE,7.8,0,ravi@campus.edu
Meera Iyer,1VV21IS003,ISE,8.4,0,meera@campus.edu
Kiran Shetty,1VV21EC004,ECE,6.1,2,kiran@campus.edu
Divya Nair,1VV21CS005,CSE,7.1,1,divya@campus.edu
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Drive date (YYYY-MM-DD). Defaults to three weeks from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) drive_date: Option<NaiveDate>,
    /// Minimum CGPA cutoff for the demo drive.
    #[arg(long)]
    pub(crate) min_cgpa: Option<f64>,
    /// Skip the assessment portion of the demo.
    #[arg(long)]
    pub(crate) skip_assessment: bool,
    /// Skip the interview scheduling portion of the demo.
    #[arg(long)]
    pub(crate) skip_interviews: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        drive_date,
        min_cgpa,
        skip_assessment,
        skip_interviews,
    } = args;

    let drive_date = drive_date.unwrap_or_else(|| Local::now().date_naive() + chrono::Duration::days(21));
    let min_cgpa = min_cgpa.unwrap_or(7.0);

    let students = Arc::new(InMemoryStudentRepository::default());
    let drives = Arc::new(InMemoryDriveRepository::default());
    let assessments = Arc::new(InMemoryAssessmentRepository::default());
    let attempts = Arc::new(InMemoryAttemptRepository::default());
    let slots = Arc::new(InMemorySlotRepository::default());
    let notifications = Arc::new(InMemoryNotificationStore::default());

    let dispatcher = Arc::new(NotificationDispatcher::new(notifications));
    let directory = Arc::new(DirectoryService::new(students.clone()));
    let drive_service = Arc::new(DriveService::new(
        students.clone(),
        drives.clone(),
        dispatcher.clone(),
    ));
    let assessment_service = Arc::new(AssessmentService::new(
        assessments,
        attempts,
        students.clone(),
    ));
    let interview_service = Arc::new(InterviewService::new(
        slots,
        students,
        drives,
        dispatcher.clone(),
    ));

    println!("Campus placement demo");

    let summary = directory.import_roster(Cursor::new(DEMO_ROSTER))?;
    println!(
        "\nRoster import: {} students added, {} rows skipped",
        summary.added, summary.skipped
    );
    for student in directory.list()? {
        println!(
            "- {} ({}) | {} | CGPA {} | {} backlog(s)",
            student.name,
            student.usn,
            student.branch,
            student
                .cgpa
                .map_or_else(|| "n/a".to_string(), |cgpa| cgpa.to_string()),
            student.backlogs.unwrap_or(0)
        );
    }

    let drive = drive_service.create(NewDrive {
        company_name: "Innova Systems".to_string(),
        description: "Graduate engineer hiring".to_string(),
        criteria: EligibilityCriteria {
            min_cgpa,
            max_backlogs: 0,
            eligible_branches: Vec::new(),
            eligible_years: Vec::new(),
        },
        package: Some("12 LPA".to_string()),
        location: Some("Bengaluru".to_string()),
        drive_date: Some(drive_date),
        deadline: None,
        status: None,
    })?;
    println!(
        "\nDrive created: {} on {} | cutoff CGPA {} | {} eligible",
        drive.company_name, drive_date, min_cgpa, drive.eligible_count
    );

    let published = drive_service.publish(&drive.id)?;
    println!("Published to {} eligible students", published.notified);

    let shortlisted = drive_service.shortlist(&drive.id)?;
    println!("Shortlisted {} candidates:", shortlisted.shortlisted);
    let mut ranked: Vec<_> = directory
        .list()?
        .into_iter()
        .filter_map(|student| {
            student
                .application_for(&drive.id)
                .and_then(|application| application.ranking)
                .map(|tier| (student.name.clone(), student.usn.to_string(), tier))
        })
        .collect();
    ranked.sort_by(|a, b| a.1.cmp(&b.1));
    for (name, usn, tier) in &ranked {
        println!("- {name} ({usn}): {}", tier.label());
    }

    let top_candidate = Usn::new("1VV21CS001");

    if !skip_assessment {
        println!("\nAssessment round");
        let assessment = assessment_service.create(NewAssessment {
            title: "Aptitude Screen".to_string(),
            kind: "Aptitude".to_string(),
            drive_id: Some(drive.id.clone()),
            questions: vec![
                Question {
                    question: "Derivative of x^2".to_string(),
                    options: vec!["x".to_string(), "2x".to_string(), "x^2".to_string()],
                    correct_answer: 1,
                    marks: 2,
                    topic: Some("Calculus".to_string()),
                },
                Question {
                    question: "Binary of 5".to_string(),
                    options: vec!["101".to_string(), "110".to_string(), "011".to_string()],
                    correct_answer: 0,
                    marks: 1,
                    topic: Some("Number systems".to_string()),
                },
                Question {
                    question: "Complexity of binary search".to_string(),
                    options: vec!["O(n)".to_string(), "O(1)".to_string(), "O(log n)".to_string()],
                    correct_answer: 2,
                    marks: 2,
                    topic: Some("Algorithms".to_string()),
                },
            ],
            time_limit_minutes: 20,
        })?;
        println!(
            "Created '{}' worth {} marks",
            assessment.title, assessment.total_marks
        );

        let start = assessment_service.start_attempt(&assessment.id, &top_candidate)?;
        let attempt_id = start.attempt().id.clone();
        let (_, attempt) = assessment_service.record_warning(&attempt_id, "tab-switch")?;
        println!(
            "Attempt {} in progress with {} proctoring warning(s)",
            attempt_id.0, attempt.warnings
        );

        let answers: HashMap<usize, String> = [
            (0, "1".to_string()),
            (1, "0".to_string()),
            (2, "1".to_string()),
        ]
        .into_iter()
        .collect();
        let outcome = assessment_service.submit(&attempt_id, answers)?;
        println!(
            "Submitted: {}/{} marks ({}%)",
            outcome.score, outcome.max_score, outcome.percentage
        );
    }

    if !skip_interviews {
        println!("\nInterview scheduling");
        let slot = interview_service.create(NewSlot {
            drive_id: drive.id.clone(),
            usn: top_candidate.to_string(),
            date: drive_date,
            start_time: demo_time(10, 0)?,
            end_time: demo_time(10, 30)?,
            mode: SlotMode::Online,
            location: Some("Google Meet".to_string()),
            notes: Some("Carry a valid college ID".to_string()),
        })?;
        println!(
            "Booked {} for {} on {} ({})",
            slot.id.0,
            slot.student_name,
            slot.date,
            slot.mode.label()
        );
        println!("Calendar link: {}", calendar_link(&slot));

        interview_service.notify_slot(&slot.id)?;
    }

    println!("\nNotification feed for {top_candidate}:");
    for notice in dispatcher.feed(&top_candidate)? {
        println!("- [{}] {}: {}", notice.category.label(), notice.title, notice.message);
    }

    let roster = directory.list()?;
    let all_drives = drive_service.list()?;
    let total_assessments = usize::from(!skip_assessment);
    let stats = DashboardStats::collect(&roster, &all_drives, total_assessments);
    println!(
        "\nDashboard: {} students | {} drives ({} active) | {} placed",
        stats.total_students, stats.total_drives, stats.active_drives, stats.placed_students
    );
    for branch in &stats.branch_stats {
        println!(
            "- {}: {} student(s), avg CGPA {}",
            branch.branch,
            branch.count,
            branch
                .avg_cgpa
                .map_or_else(|| "n/a".to_string(), |avg| format!("{avg:.2}"))
        );
    }

    Ok(())
}

fn demo_time(hour: u32, minute: u32) -> Result<NaiveTime, AppError> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::Workflow(format!("invalid demo time {hour:02}:{minute:02}")))
}
