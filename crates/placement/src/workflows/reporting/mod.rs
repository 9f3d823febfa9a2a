//! Pure dashboard aggregations over directory and drive snapshots.

use serde::Serialize;

use crate::workflows::directory::domain::Student;
use crate::workflows::drives::domain::{ApplicationStatus, Drive, DriveStatus};

/// CGPA histogram boundaries; the last bucket is inclusive of 10.0.
const CGPA_BOUNDARIES: [(f64, f64); 5] = [
    (0.0, 6.0),
    (6.0, 7.0),
    (7.0, 8.0),
    (8.0, 9.0),
    (9.0, 10.1),
];

/// Headcount and mean CGPA for one branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchStat {
    pub branch: String,
    pub count: usize,
    pub avg_cgpa: Option<f64>,
}

/// One CGPA histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgpaBucket {
    pub range: String,
    pub count: usize,
}

/// Snapshot rendered on the operator dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_drives: usize,
    pub active_drives: usize,
    pub total_assessments: usize,
    /// Students with at least one shortlisted or selected application.
    pub placed_students: usize,
    pub branch_stats: Vec<BranchStat>,
    pub recent_drives: Vec<Drive>,
    pub cgpa_ranges: Vec<CgpaBucket>,
}

impl DashboardStats {
    pub fn collect(students: &[Student], drives: &[Drive], total_assessments: usize) -> Self {
        let placed_students = students
            .iter()
            .filter(|student| {
                student.drive_applications.iter().any(|application| {
                    matches!(
                        application.status,
                        ApplicationStatus::Shortlisted | ApplicationStatus::Selected
                    )
                })
            })
            .count();

        let mut recent_drives: Vec<Drive> = drives.to_vec();
        recent_drives.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_drives.truncate(5);

        Self {
            total_students: students.len(),
            total_drives: drives.len(),
            active_drives: drives
                .iter()
                .filter(|drive| drive.status == DriveStatus::Active)
                .count(),
            total_assessments,
            placed_students,
            branch_stats: branch_stats(students),
            recent_drives,
            cgpa_ranges: cgpa_ranges(students),
        }
    }
}

fn branch_stats(students: &[Student]) -> Vec<BranchStat> {
    let mut grouped: Vec<(String, usize, f64, usize)> = Vec::new();
    for student in students {
        match grouped.iter_mut().find(|(branch, ..)| branch == &student.branch) {
            Some((_, count, cgpa_sum, cgpa_count)) => {
                *count += 1;
                if let Some(cgpa) = student.cgpa {
                    *cgpa_sum += cgpa;
                    *cgpa_count += 1;
                }
            }
            None => grouped.push((
                student.branch.clone(),
                1,
                student.cgpa.unwrap_or(0.0),
                usize::from(student.cgpa.is_some()),
            )),
        }
    }

    let mut stats: Vec<BranchStat> = grouped
        .into_iter()
        .map(|(branch, count, cgpa_sum, cgpa_count)| BranchStat {
            branch,
            count,
            avg_cgpa: (cgpa_count > 0).then(|| cgpa_sum / cgpa_count as f64),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.branch.cmp(&b.branch)));
    stats
}

fn cgpa_ranges(students: &[Student]) -> Vec<CgpaBucket> {
    CGPA_BOUNDARIES
        .iter()
        .map(|(low, high)| {
            let count = students
                .iter()
                .filter_map(|student| student.cgpa)
                .filter(|cgpa| cgpa >= low && cgpa < high)
                .count();
            let label_high = if *high > 10.0 { 10.0 } else { *high };
            CgpaBucket {
                range: format!("{low}-{label_high}"),
                count,
            }
        })
        .collect()
}
