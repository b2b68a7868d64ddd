use std::collections::BTreeMap;

use serde::Serialize;

use super::error::ComparisonError;
use crate::catalog::{QuestionId, Section};

pub const SECTION_BUDGET: u32 = 100;

/// Advisory state of a section's weight budget. Never enforced beyond the clamp in
/// [`WeightAllocator::set_weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Balanced,
    UnderAllocated,
    OverAllocated,
}

impl BudgetStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::UnderAllocated => "Under-allocated",
            Self::OverAllocated => "Over-allocated",
        }
    }

    pub fn from_total(total: u32) -> Self {
        match total.cmp(&SECTION_BUDGET) {
            std::cmp::Ordering::Equal => Self::Balanced,
            std::cmp::Ordering::Less => Self::UnderAllocated,
            std::cmp::Ordering::Greater => Self::OverAllocated,
        }
    }
}

/// Per-question weights grouped by section, each section sharing a budget of 100.
#[derive(Debug, Clone)]
pub struct WeightAllocator {
    sections: Vec<Section>,
    weights: BTreeMap<QuestionId, u32>,
    section_index: BTreeMap<QuestionId, usize>,
}

impl WeightAllocator {
    /// Even split per section: `100 / n` each, the first `100 % n` questions get one more.
    pub fn new(sections: Vec<Section>) -> Self {
        let mut weights = BTreeMap::new();
        let mut section_index = BTreeMap::new();

        for (index, section) in sections.iter().enumerate() {
            let count = section.question_ids.len() as u32;
            if count == 0 {
                continue;
            }
            let base = SECTION_BUDGET / count;
            let remainder = SECTION_BUDGET % count;
            for (position, question_id) in section.question_ids.iter().enumerate() {
                let bonus = u32::from((position as u32) < remainder);
                weights.insert(question_id.clone(), base + bonus);
                section_index.insert(question_id.clone(), index);
            }
        }

        Self {
            sections,
            weights,
            section_index,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn weight(&self, question_id: &QuestionId) -> Option<u32> {
        self.weights.get(question_id).copied()
    }

    pub fn weights(&self) -> &BTreeMap<QuestionId, u32> {
        &self.weights
    }

    /// Apply a reviewer-requested weight, clamped to `[0, 100 - other weights in section]`.
    /// Returns the value actually stored.
    pub fn set_weight(
        &mut self,
        question_id: &QuestionId,
        requested: i64,
    ) -> Result<u32, ComparisonError> {
        let index = *self
            .section_index
            .get(question_id)
            .ok_or_else(|| ComparisonError::UnknownQuestion(question_id.clone()))?;

        let others: u32 = self.sections[index]
            .question_ids
            .iter()
            .filter(|id| *id != question_id)
            .filter_map(|id| self.weights.get(id))
            .sum();
        let ceiling = i64::from(SECTION_BUDGET.saturating_sub(others));
        let applied = requested.clamp(0, ceiling) as u32;

        self.weights.insert(question_id.clone(), applied);
        Ok(applied)
    }

    pub fn section_total(&self, section: &Section) -> u32 {
        section
            .question_ids
            .iter()
            .filter_map(|id| self.weights.get(id))
            .sum()
    }

    pub fn budget(&self, section: &Section) -> BudgetStatus {
        BudgetStatus::from_total(self.section_total(section))
    }
}
