use super::common::*;
use crate::catalog::QuestionCatalog;
use crate::comparison::{BudgetStatus, ComparisonError, ComparisonSession, StarRating};
use crate::responses::SubjectId;

fn stars(value: f64) -> StarRating {
    StarRating::new(value).expect("valid rating")
}

#[test]
fn three_question_section_starts_at_34_33_33_and_clamps_raise() {
    let mut session = open_session(&["acme"]);
    let weights = session.weights();
    assert_eq!(weights.weight(&question(QUOTE)), Some(34));
    assert_eq!(weights.weight(&question(PAYMENT_TERMS)), Some(33));
    assert_eq!(weights.weight(&question(DISCOUNTS)), Some(33));
    assert_eq!(weights.weight(&question(TEAM_SIZE)), Some(100));
    assert_eq!(weights.weight(&question(NOTES)), None);

    let change = session
        .set_weight(&question(QUOTE), 50)
        .expect("weighted question");
    assert_eq!(change.applied, 34);
    assert_eq!(change.section.total, 100);
    assert_eq!(change.section.status, BudgetStatus::Balanced);
}

#[test]
fn lowering_a_weight_leaves_section_under_allocated() {
    let mut session = open_session(&["acme"]);
    let change = session
        .set_weight(&question(PAYMENT_TERMS), 13)
        .expect("weighted question");
    assert_eq!(change.applied, 13);
    assert_eq!(change.section.total, 80);
    assert_eq!(change.section.status, BudgetStatus::UnderAllocated);

    let change = session
        .set_weight(&question(QUOTE), -20)
        .expect("weighted question");
    assert_eq!(change.applied, 0);
    assert_eq!(change.requested, -20);
}

#[test]
fn freed_budget_can_be_reassigned_up_to_the_remainder() {
    let mut session = open_session(&["acme"]);
    session
        .set_weight(&question(DISCOUNTS), 3)
        .expect("weighted question");
    let change = session
        .set_weight(&question(QUOTE), 90)
        .expect("weighted question");
    assert_eq!(change.applied, 64);
    assert_eq!(change.section.total, 100);
}

#[test]
fn section_score_is_linear_in_stars() {
    let mut session = open_session(&["acme"]);
    for id in [QUOTE, PAYMENT_TERMS, DISCOUNTS] {
        session
            .rate("acme", &question(id), stars(5.0))
            .expect("rating accepted");
    }
    assert_eq!(session.section_score("acme", PRICING), Ok(100.0));

    for id in [QUOTE, PAYMENT_TERMS, DISCOUNTS] {
        session
            .rate("acme", &question(id), stars(2.5))
            .expect("rating accepted");
    }
    assert_eq!(session.section_score("acme", PRICING), Ok(50.0));

    for id in [QUOTE, PAYMENT_TERMS, DISCOUNTS] {
        session
            .rate("acme", &question(id), stars(0.0))
            .expect("rating accepted");
    }
    assert_eq!(session.section_score("acme", PRICING), Ok(0.0));
}

#[test]
fn under_allocated_section_caps_at_its_total_weight() {
    let mut session = open_session(&["acme"]);
    session
        .set_weight(&question(PAYMENT_TERMS), 13)
        .expect("weighted question");
    for id in [QUOTE, PAYMENT_TERMS, DISCOUNTS] {
        session
            .rate("acme", &question(id), stars(5.0))
            .expect("rating accepted");
    }
    assert_eq!(session.section_score("acme", PRICING), Ok(80.0));
}

#[test]
fn unrated_questions_count_as_zero_and_scores_round_to_tenths() {
    let mut session = open_session(&["acme"]);
    // 34 * 3.5 / 5 = 23.8
    session
        .rate("acme", &question(QUOTE), stars(3.5))
        .expect("rating accepted");
    assert_eq!(session.section_score("acme", PRICING), Ok(23.8));
    assert_eq!(session.section_score("acme", TEAM), Ok(0.0));
    // mean of 23.8 and 0.0
    assert_eq!(session.overall_score("acme"), Ok(11.9));
}

#[test]
fn summary_ranks_vendors_by_overall_then_id() {
    let mut session = open_session(&["zenith", "acme", "beacon"]);
    session
        .rate("beacon", &question(TEAM_SIZE), stars(4.0))
        .expect("rating accepted");

    let summary = session.summary();
    let order: Vec<_> = summary
        .vendors
        .iter()
        .map(|vendor| vendor.vendor_id.as_str())
        .collect();
    assert_eq!(order, vec!["beacon", "acme", "zenith"]);
    assert_eq!(summary.vendors[0].overall_score, 40.0);
    assert_eq!(summary.sections.len(), 2);
    assert!(summary
        .vendors
        .iter()
        .all(|vendor| (60..=95).contains(&vendor.match_percentage)));
}

#[test]
fn validation_errors_name_the_offending_input() {
    let mut session = open_session(&["acme"]);
    assert_eq!(
        session.rate("globex", &question(QUOTE), stars(3.0)),
        Err(ComparisonError::UnknownVendor("globex".to_string()))
    );
    assert_eq!(
        session.rate("acme", &question(NOTES), stars(3.0)),
        Err(ComparisonError::UnknownQuestion(question(NOTES)))
    );
    assert!(matches!(
        session.set_weight(&question("missing"), 10),
        Err(ComparisonError::UnknownQuestion(_))
    ));
    assert_eq!(
        session.overall_score("globex"),
        Err(ComparisonError::UnknownVendor("globex".to_string()))
    );
}

#[test]
fn opening_requires_a_vendor_and_dedupes_ids() {
    let empty = ComparisonSession::open(
        "cmp-empty",
        SubjectId::new("rfp-1"),
        &catalog(),
        vec!["  ".to_string()],
    );
    assert!(matches!(empty, Err(ComparisonError::NoVendors)));

    let session = open_session(&["acme", "acme", " beacon "]);
    assert_eq!(session.vendors(), ["acme".to_string(), "beacon".to_string()]);
}

#[test]
fn standard_template_sessions_are_balanced() {
    let session = ComparisonSession::open(
        "cmp-standard",
        SubjectId::new("rfp-1"),
        &QuestionCatalog::standard(),
        vec!["acme".to_string()],
    )
    .expect("session opens");

    let summary = session.summary();
    assert!(!summary.sections.is_empty());
    assert!(summary
        .sections
        .iter()
        .all(|section| section.total == 100 && section.status == BudgetStatus::Balanced));
}
