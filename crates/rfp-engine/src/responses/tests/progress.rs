use std::collections::BTreeMap;

use chrono::Utc;

use super::common::*;
use crate::catalog::QuestionId;
use crate::responses::progress::{calculate, ProgressStats};
use crate::responses::{ResponseMap, ResponseRecord, ResponseStatus, ResponseValue};

fn responses_with(statuses: &[ResponseStatus]) -> ResponseMap {
    statuses
        .iter()
        .enumerate()
        .map(|(index, status)| {
            (
                QuestionId::new(format!("q{index}")),
                ResponseRecord {
                    value: Some(ResponseValue::text("answer")),
                    status: *status,
                    updated_at: Utc::now(),
                    completed_at: None,
                    completed_value: None,
                },
            )
        })
        .collect::<BTreeMap<_, _>>()
}

#[test]
fn scenario_ten_questions_three_completed_two_in_progress() {
    use ResponseStatus::*;
    let responses = responses_with(&[Completed, Completed, Completed, InProgress, InProgress]);

    assert_eq!(
        calculate(&responses, 10),
        ProgressStats {
            completed: 3,
            in_progress: 2,
            remaining: 5,
            percentage: 30,
        }
    );
}

#[test]
fn not_started_and_prefilled_count_toward_neither_bucket() {
    use ResponseStatus::*;
    let responses = responses_with(&[NotStarted, PreFilled, Completed]);

    let stats = calculate(&responses, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.in_progress, 0);
    assert_eq!(stats.remaining, 3);
    assert_eq!(stats.percentage, 25);
}

#[test]
fn zero_total_reports_zero_percent() {
    let stats = calculate(&ResponseMap::new(), 0);
    assert_eq!(stats.percentage, 0);
    assert_eq!(stats.remaining, 0);
}

#[test]
fn undercounted_total_is_passed_through_unclamped() {
    use ResponseStatus::*;
    let responses = responses_with(&[Completed, Completed, InProgress]);

    let stats = calculate(&responses, 2);
    assert_eq!(stats.remaining, -1);
    assert_eq!(stats.percentage, 100);
}

#[test]
fn percentage_rounds_half_up() {
    use ResponseStatus::*;
    let responses = responses_with(&[Completed]);
    assert_eq!(calculate(&responses, 8).percentage, 13);
    assert_eq!(calculate(&responses, 3).percentage, 33);
}

#[test]
fn manager_progress_uses_catalog_size() {
    let (manager, _) = build_manager();
    let s1 = subject("s1");
    manager.record_answer(&s1, &question(SHARED), Some(ResponseValue::text("hello")));
    manager.mark_complete(&s1, &question(SHARED)).expect("answer present");
    manager.record_answer(&s1, &question(OPTIONAL), Some(ResponseValue::text("wip")));

    let stats = manager.catalog_progress(&s1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.remaining, 2);
    assert_eq!(stats.percentage, 25);
}
