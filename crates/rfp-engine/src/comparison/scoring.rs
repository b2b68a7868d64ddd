use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ComparisonError;
use super::weights::WeightAllocator;
use crate::catalog::{QuestionId, Section};

pub const MAX_STARS: f64 = 5.0;

/// Star rating in `[0, 5]` on a half-star grid, stored as a count of half stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct StarRating(u8);

impl StarRating {
    pub fn new(stars: f64) -> Result<Self, ComparisonError> {
        let halves = stars * 2.0;
        let on_grid = halves.is_finite() && halves.fract() == 0.0;
        if !on_grid || !(0.0..=MAX_STARS * 2.0).contains(&halves) {
            return Err(ComparisonError::InvalidRating(stars));
        }
        Ok(Self(halves as u8))
    }

    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    pub fn half_stars(self) -> u8 {
        self.0
    }
}

impl Serialize for StarRating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.stars())
    }
}

impl<'de> Deserialize<'de> for StarRating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stars = f64::deserialize(deserializer)?;
        Self::new(stars).map_err(serde::de::Error::custom)
    }
}

/// Ratings a single vendor has received, keyed by question.
pub type VendorRatings = BTreeMap<QuestionId, StarRating>;

/// `100 * sum(stars / 5 * weight / 100)` over the section, rounded to one decimal.
/// Unrated questions count as zero stars and weights are not normalized, so a section whose
/// weights sum to 80 tops out at 80.0.
pub fn section_score(ratings: &VendorRatings, section: &Section, weights: &WeightAllocator) -> f64 {
    // half_stars * weight / 10 is exact in tenths
    let tenths: u32 = section
        .question_ids
        .iter()
        .map(|id| {
            let halves = ratings.get(id).map_or(0, |rating| u32::from(rating.half_stars()));
            halves * weights.weight(id).unwrap_or(0)
        })
        .sum();
    f64::from(tenths) / 10.0
}

/// Mean of the vendor's section scores across every non-empty section, one decimal.
pub fn overall_score(ratings: &VendorRatings, weights: &WeightAllocator) -> f64 {
    let scores: Vec<f64> = weights
        .sections()
        .iter()
        .filter(|section| !section.question_ids.is_empty())
        .map(|section| section_score(ratings, section, weights))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    round_tenth(scores.iter().sum::<f64>() / scores.len() as f64)
}

pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_rating_accepts_half_steps_only() {
        assert_eq!(StarRating::new(3.5).map(StarRating::half_stars), Ok(7));
        assert_eq!(StarRating::new(0.0).map(StarRating::stars), Ok(0.0));
        assert_eq!(StarRating::new(5.0).map(StarRating::stars), Ok(5.0));
        assert_eq!(
            StarRating::new(4.25),
            Err(ComparisonError::InvalidRating(4.25))
        );
        assert!(StarRating::new(5.5).is_err());
        assert!(StarRating::new(-0.5).is_err());
        assert!(StarRating::new(f64::NAN).is_err());
    }

    #[test]
    fn star_rating_deserializes_with_validation() {
        let rating: StarRating = serde_json::from_str("4.5").expect("valid rating");
        assert_eq!(rating.half_stars(), 9);
        assert!(serde_json::from_str::<StarRating>("4.2").is_err());
        assert_eq!(serde_json::to_string(&rating).expect("serialize"), "4.5");
    }

    #[test]
    fn round_tenth_rounds_half_away_from_zero() {
        assert_eq!(round_tenth(66.65000001), 66.7);
        assert_eq!(round_tenth(33.34), 33.3);
    }
}
