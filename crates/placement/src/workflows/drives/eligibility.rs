use serde::Serialize;

use crate::workflows::directory::domain::Student;

use super::domain::EligibilityCriteria;

/// Verdict of the eligibility evaluator: a boolean plus one human-readable
/// reason per failed predicate. Reasons are collected for every failure,
/// never short-circuited, so the student view can show the full gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

impl EligibilityVerdict {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Apply a drive's criterion to a single student. Numeric fields missing from
/// the record fail their predicate; they never silently pass.
pub fn evaluate(student: &Student, criteria: &EligibilityCriteria) -> EligibilityVerdict {
    let mut reasons = Vec::new();

    match student.cgpa {
        Some(cgpa) if cgpa >= criteria.min_cgpa => {}
        Some(cgpa) => reasons.push(format!("CGPA {cgpa} < required {}", criteria.min_cgpa)),
        None => reasons.push(format!(
            "CGPA not on record, required {}",
            criteria.min_cgpa
        )),
    }

    match student.backlogs {
        Some(backlogs) if backlogs <= criteria.max_backlogs => {}
        Some(backlogs) => reasons.push(format!(
            "{backlogs} backlog(s) exceed limit of {}",
            criteria.max_backlogs
        )),
        None => reasons.push(format!(
            "backlog count not on record, limit {}",
            criteria.max_backlogs
        )),
    }

    if !criteria.eligible_branches.is_empty()
        && !criteria
            .eligible_branches
            .iter()
            .any(|branch| branch == &student.branch)
    {
        reasons.push(format!(
            "Branch {} not eligible ({})",
            student.branch,
            criteria.eligible_branches.join(", ")
        ));
    }

    if !criteria.eligible_years.is_empty() {
        match student.year {
            Some(year) if criteria.eligible_years.contains(&year) => {}
            Some(year) => reasons.push(format!("Year {year} not in eligible years")),
            None => reasons.push("Year not on record".to_string()),
        }
    }

    EligibilityVerdict::from_reasons(reasons)
}

/// Filter the whole directory down to a drive's eligible set.
pub fn eligible_set(students: Vec<Student>, criteria: &EligibilityCriteria) -> Vec<Student> {
    students
        .into_iter()
        .filter(|student| evaluate(student, criteria).eligible)
        .collect()
}
