//! Question templates supplied to the response and comparison engines.

mod blueprint;
pub mod domain;

pub use blueprint::QuestionCatalog;
pub use domain::{FieldType, Question, QuestionId, Section, SubQuestion};
