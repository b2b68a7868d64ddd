use thiserror::Error;

use crate::catalog::QuestionId;

/// Validation failures raised while reviewing vendors in a comparison session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("question `{0}` is not weighted in this comparison")]
    UnknownQuestion(QuestionId),
    #[error("vendor `{0}` is not part of this comparison")]
    UnknownVendor(String),
    #[error("comparison session `{0}` was not found")]
    UnknownSession(String),
    #[error("rating {0} is invalid; use 0 to 5 stars in half-star steps")]
    InvalidRating(f64),
    #[error("a comparison needs at least one vendor")]
    NoVendors,
}
