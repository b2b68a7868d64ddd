//! Buyer-side vendor comparison: section weight budgets, weighted star scoring and the match
//! estimate.

pub mod error;
pub mod matching;
pub mod registry;
pub mod router;
pub mod scoring;
pub mod session;
pub mod views;
pub mod weights;

#[cfg(test)]
mod tests;

pub use error::ComparisonError;
pub use matching::{match_percentage, MATCH_CEILING, MATCH_FLOOR};
pub use registry::ComparisonRegistry;
pub use router::{comparison_router, OpenComparisonRequest, RatingRequest, WeightRequest};
pub use scoring::{overall_score, section_score, StarRating, VendorRatings};
pub use session::ComparisonSession;
pub use views::{
    ComparisonSummary, SectionBudgetView, SectionScoreView, VendorScoreView, WeightChangeView,
};
pub use weights::{BudgetStatus, WeightAllocator, SECTION_BUDGET};
