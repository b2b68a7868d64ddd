use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{FieldType, Question, QuestionCatalog, QuestionId};
use crate::comparison::{ComparisonRegistry, ComparisonSession};
use crate::responses::SubjectId;

pub(super) const PRICING: &str = "Pricing";
pub(super) const TEAM: &str = "Team";
pub(super) const QUOTE: &str = "quote";
pub(super) const PAYMENT_TERMS: &str = "payment_terms";
pub(super) const DISCOUNTS: &str = "discounts";
pub(super) const TEAM_SIZE: &str = "team_size";
pub(super) const NOTES: &str = "notes";

/// Three weighted pricing questions, one weighted team question and one unweighted note.
pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        Question::new(QUOTE, PRICING, "Total quote.", FieldType::FreeText).weighted(),
        Question::new(PAYMENT_TERMS, PRICING, "Payment terms.", FieldType::Dropdown)
            .weighted()
            .with_options(["Net 30", "Net 60"]),
        Question::new(DISCOUNTS, PRICING, "Volume discounts.", FieldType::FreeText).weighted(),
        Question::new(TEAM_SIZE, TEAM, "Team size.", FieldType::SingleSelect).weighted(),
        Question::new(NOTES, TEAM, "Anything else?", FieldType::FreeText),
    ])
}

pub(super) fn question(id: &str) -> QuestionId {
    QuestionId::new(id)
}

pub(super) fn open_session(vendors: &[&str]) -> ComparisonSession {
    ComparisonSession::open(
        "cmp-test",
        SubjectId::new("rfp-1"),
        &catalog(),
        vendors.iter().map(|vendor| vendor.to_string()),
    )
    .expect("session opens")
}

pub(super) fn registry() -> Arc<ComparisonRegistry> {
    Arc::new(ComparisonRegistry::new(Arc::new(catalog())))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
