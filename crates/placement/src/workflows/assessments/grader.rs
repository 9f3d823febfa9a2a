use std::collections::HashMap;

use serde::Serialize;

use super::domain::Question;

/// Result of grading one answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeResult {
    pub score: u32,
    pub total_marks: u32,
    /// Rounded to the nearest whole percent; 0 when there are no marks.
    pub percentage: u32,
}

/// Grade an answer sheet against the question list. Answers arrive keyed by
/// question index with the selected option index as a string; anything that
/// does not parse to the correct option index earns nothing. Unanswered
/// questions still contribute their marks to the total.
pub fn grade(questions: &[Question], answers: &HashMap<usize, String>) -> GradeResult {
    let mut score = 0;
    let mut total_marks = 0;

    for (index, question) in questions.iter().enumerate() {
        total_marks += question.marks;
        let correct = answers
            .get(&index)
            .and_then(|answer| answer.trim().parse::<usize>().ok())
            .is_some_and(|selected| selected == question.correct_answer);
        if correct {
            score += question.marks;
        }
    }

    let percentage = if total_marks == 0 {
        0
    } else {
        ((score as f64 / total_marks as f64) * 100.0).round() as u32
    };

    GradeResult {
        score,
        total_marks,
        percentage,
    }
}
