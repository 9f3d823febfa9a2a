use serde::Serialize;

use crate::workflows::directory::domain::{Student, Usn};

use super::domain::RankingTier;

/// Weight applied to the CGPA component of the composite score.
const CGPA_WEIGHT: f64 = 10.0;
/// Weight applied to the assessment percentage component.
const ASSESSMENT_WEIGHT: f64 = 30.0;

const BEST_THRESHOLD: f64 = 90.0;
const BETTER_THRESHOLD: f64 = 70.0;

/// Scored member of a drive's eligible set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub usn: Usn,
    pub name: String,
    pub score: f64,
    pub tier: RankingTier,
}

/// Composite score = cgpa x 10 + 30 x (score/max) of the first assessment
/// record with a positive maximum. First match wins, not best match; a later
/// retake never displaces the score already on record.
pub fn composite_score(student: &Student) -> f64 {
    let mut score = student.cgpa.unwrap_or(0.0) * CGPA_WEIGHT;
    if let Some(entry) = student
        .assessment_scores
        .iter()
        .find(|entry| entry.max_score > 0)
    {
        score += (entry.score as f64 / entry.max_score as f64) * ASSESSMENT_WEIGHT;
    }
    score
}

pub fn tier_for(score: f64) -> RankingTier {
    if score >= BEST_THRESHOLD {
        RankingTier::Best
    } else if score >= BETTER_THRESHOLD {
        RankingTier::Better
    } else {
        RankingTier::Average
    }
}

/// Score and bucket every member of the eligible set. Pure: persistence and
/// notification side effects belong to the drive service.
pub fn rank(students: &[Student]) -> Vec<RankedCandidate> {
    students
        .iter()
        .map(|student| {
            let score = composite_score(student);
            RankedCandidate {
                usn: student.usn.clone(),
                name: student.name.clone(),
                score,
                tier: tier_for(score),
            }
        })
        .collect()
}
