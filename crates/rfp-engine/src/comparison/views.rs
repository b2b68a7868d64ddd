use std::collections::BTreeMap;

use serde::Serialize;

use super::weights::BudgetStatus;
use crate::catalog::QuestionId;
use crate::responses::SubjectId;

#[derive(Debug, Clone, Serialize)]
pub struct SectionBudgetView {
    pub section: String,
    pub weights: BTreeMap<QuestionId, u32>,
    pub total: u32,
    pub status: BudgetStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScoreView {
    pub section: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorScoreView {
    pub vendor_id: String,
    pub section_scores: Vec<SectionScoreView>,
    pub overall_score: f64,
    pub match_percentage: u8,
}

/// Reviewer-facing snapshot of a comparison session, vendors ranked best first.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub session_id: String,
    pub subject_id: SubjectId,
    pub sections: Vec<SectionBudgetView>,
    pub vendors: Vec<VendorScoreView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightChangeView {
    pub question_id: QuestionId,
    pub requested: i64,
    pub applied: u32,
    pub section: SectionBudgetView,
}
