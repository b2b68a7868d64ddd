use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::ComparisonError;
use super::matching::match_percentage;
use super::scoring::{overall_score, section_score, StarRating, VendorRatings};
use super::views::{
    ComparisonSummary, SectionBudgetView, SectionScoreView, VendorScoreView, WeightChangeView,
};
use super::weights::WeightAllocator;
use crate::catalog::{QuestionCatalog, QuestionId, Section};
use crate::responses::SubjectId;

/// One reviewer's side-by-side evaluation of vendors for a subject. Weights and ratings live
/// only as long as the session.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    id: String,
    subject_id: SubjectId,
    vendors: Vec<String>,
    weights: WeightAllocator,
    ratings: BTreeMap<String, VendorRatings>,
    opened_at: DateTime<Utc>,
}

impl ComparisonSession {
    pub fn open(
        id: impl Into<String>,
        subject_id: SubjectId,
        catalog: &QuestionCatalog,
        vendors: impl IntoIterator<Item = String>,
    ) -> Result<Self, ComparisonError> {
        let mut unique = Vec::new();
        for vendor in vendors {
            let vendor = vendor.trim().to_string();
            if !vendor.is_empty() && !unique.contains(&vendor) {
                unique.push(vendor);
            }
        }
        if unique.is_empty() {
            return Err(ComparisonError::NoVendors);
        }

        let ratings = unique
            .iter()
            .map(|vendor| (vendor.clone(), VendorRatings::new()))
            .collect();

        Ok(Self {
            id: id.into(),
            subject_id,
            vendors: unique,
            weights: WeightAllocator::new(catalog.weighted_sections()),
            ratings,
            opened_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn vendors(&self) -> &[String] {
        &self.vendors
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn weights(&self) -> &WeightAllocator {
        &self.weights
    }

    pub fn set_weight(
        &mut self,
        question_id: &QuestionId,
        requested: i64,
    ) -> Result<WeightChangeView, ComparisonError> {
        let applied = self.weights.set_weight(question_id, requested)?;
        if i64::from(applied) != requested {
            debug!(
                session = %self.id,
                question = %question_id,
                requested,
                applied,
                "weight clamped to section budget"
            );
        }
        let section = self
            .section_of(question_id)
            .map(|section| self.budget_view(section))
            .ok_or_else(|| ComparisonError::UnknownQuestion(question_id.clone()))?;

        Ok(WeightChangeView {
            question_id: question_id.clone(),
            requested,
            applied,
            section,
        })
    }

    /// Record a vendor's rating on a weighted question, replacing any earlier rating.
    pub fn rate(
        &mut self,
        vendor_id: &str,
        question_id: &QuestionId,
        rating: StarRating,
    ) -> Result<VendorScoreView, ComparisonError> {
        if self.weights.weight(question_id).is_none() {
            return Err(ComparisonError::UnknownQuestion(question_id.clone()));
        }
        let ratings = self
            .ratings
            .get_mut(vendor_id)
            .ok_or_else(|| ComparisonError::UnknownVendor(vendor_id.to_string()))?;
        ratings.insert(question_id.clone(), rating);
        Ok(self.vendor_view(vendor_id))
    }

    pub fn rating(&self, vendor_id: &str, question_id: &QuestionId) -> Option<StarRating> {
        self.ratings.get(vendor_id)?.get(question_id).copied()
    }

    pub fn section_score(&self, vendor_id: &str, section: &str) -> Result<f64, ComparisonError> {
        let ratings = self.vendor_ratings(vendor_id)?;
        Ok(self
            .weights
            .sections()
            .iter()
            .find(|candidate| candidate.name == section)
            .map_or(0.0, |section| section_score(ratings, section, &self.weights)))
    }

    pub fn overall_score(&self, vendor_id: &str) -> Result<f64, ComparisonError> {
        let ratings = self.vendor_ratings(vendor_id)?;
        Ok(overall_score(ratings, &self.weights))
    }

    pub fn summary(&self) -> ComparisonSummary {
        let sections = self
            .weights
            .sections()
            .iter()
            .map(|section| self.budget_view(section))
            .collect();

        let mut vendors: Vec<VendorScoreView> = self
            .vendors
            .iter()
            .map(|vendor| self.vendor_view(vendor))
            .collect();
        vendors.sort_by(|left, right| {
            right
                .overall_score
                .partial_cmp(&left.overall_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.vendor_id.cmp(&right.vendor_id))
        });

        ComparisonSummary {
            session_id: self.id.clone(),
            subject_id: self.subject_id.clone(),
            sections,
            vendors,
        }
    }

    fn vendor_ratings(&self, vendor_id: &str) -> Result<&VendorRatings, ComparisonError> {
        self.ratings
            .get(vendor_id)
            .ok_or_else(|| ComparisonError::UnknownVendor(vendor_id.to_string()))
    }

    fn section_of(&self, question_id: &QuestionId) -> Option<&Section> {
        self.weights
            .sections()
            .iter()
            .find(|section| section.question_ids.contains(question_id))
    }

    fn budget_view(&self, section: &Section) -> SectionBudgetView {
        let status = self.weights.budget(section);
        SectionBudgetView {
            section: section.name.clone(),
            weights: section
                .question_ids
                .iter()
                .filter_map(|id| self.weights.weight(id).map(|weight| (id.clone(), weight)))
                .collect(),
            total: self.weights.section_total(section),
            status,
            status_label: status.label(),
        }
    }

    fn vendor_view(&self, vendor_id: &str) -> VendorScoreView {
        let empty = VendorRatings::new();
        let ratings = self.ratings.get(vendor_id).unwrap_or(&empty);
        VendorScoreView {
            vendor_id: vendor_id.to_string(),
            section_scores: self
                .weights
                .sections()
                .iter()
                .map(|section| SectionScoreView {
                    section: section.name.clone(),
                    score: section_score(ratings, section, &self.weights),
                })
                .collect(),
            overall_score: overall_score(ratings, &self.weights),
            match_percentage: match_percentage(self.subject_id.as_str(), vendor_id),
        }
    }
}
