use serde::Serialize;

use super::domain::ResponseStatus;
use super::repository::ResponseMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub completed: usize,
    pub in_progress: usize,
    /// Not clamped: an undercounted total drives this negative.
    pub remaining: i64,
    pub percentage: u32,
}

pub fn calculate(responses: &ResponseMap, total_questions: usize) -> ProgressStats {
    let completed = responses
        .values()
        .filter(|record| record.status == ResponseStatus::Completed)
        .count();
    let in_progress = responses
        .values()
        .filter(|record| record.status == ResponseStatus::InProgress)
        .count();

    let remaining = total_questions as i64 - completed as i64 - in_progress as i64;
    let percentage = if total_questions == 0 {
        0
    } else {
        (100.0 * completed as f64 / total_questions as f64).round() as u32
    };

    ProgressStats {
        completed,
        in_progress,
        remaining,
        percentage,
    }
}
