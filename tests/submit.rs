use std::collections::BTreeMap;

use serde_json::{Value, json};

use ngsc_terminal::http_client::{ApiError, Verb};
use ngsc_terminal::player_api::LEGACY_STATS_CHAIN;
use ngsc_terminal::submit::{SubmitOutcome, submit_with_fallback};

fn payload() -> Value {
    json!({ "total_goals": 2 })
}

#[test]
fn single_verb_success_makes_exactly_one_call() {
    let mut calls = Vec::new();
    let outcome = submit_with_fallback(&[Verb::Patch], &payload(), |verb, _| {
        calls.push(verb);
        Ok(json!({ "ok": true }))
    });

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(calls, vec![Verb::Patch]);
}

#[test]
fn legacy_chain_resolves_on_third_verb_with_exactly_three_calls() {
    let mut calls = Vec::new();
    let outcome = submit_with_fallback(&LEGACY_STATS_CHAIN, &payload(), |verb, _| {
        calls.push(verb);
        match verb {
            Verb::Patch => Ok(json!({ "id": 9 })),
            _ => Err(ApiError::MethodNotAllowed),
        }
    });

    match outcome {
        SubmitOutcome::Success { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(calls, vec![Verb::Put, Verb::Post, Verb::Patch]);
}

#[test]
fn no_verb_is_attempted_after_a_success() {
    let mut calls = 0;
    let outcome = submit_with_fallback(&LEGACY_STATS_CHAIN, &payload(), |_, _| {
        calls += 1;
        Ok(json!(null))
    });

    assert_eq!(outcome.attempts(), 1);
    assert_eq!(calls, 1);
}

#[test]
fn validation_failure_is_terminal_and_never_retried() {
    let mut calls = 0;
    let outcome = submit_with_fallback(&LEGACY_STATS_CHAIN, &payload(), |_, _| {
        calls += 1;
        let mut fields = BTreeMap::new();
        fields.insert("total_goals".to_string(), vec!["too large".to_string()]);
        Err(ApiError::Validation { fields })
    });

    assert_eq!(calls, 1);
    match outcome {
        SubmitOutcome::Failed { error, attempts } => {
            assert_eq!(attempts, 1);
            assert!(matches!(error, ApiError::Validation { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn unauthorized_aborts_the_chain() {
    let mut calls = 0;
    let outcome = submit_with_fallback(&LEGACY_STATS_CHAIN, &payload(), |_, _| {
        calls += 1;
        Err(ApiError::Unauthorized)
    });

    assert_eq!(calls, 1);
    assert!(!outcome.is_success());
}

#[test]
fn exhausted_chain_reports_the_last_error() {
    let outcome = submit_with_fallback(&LEGACY_STATS_CHAIN, &payload(), |verb, _| {
        Err(ApiError::Status {
            status: 503,
            message: format!("{} unavailable", verb.label()),
        })
    });

    match outcome {
        SubmitOutcome::Failed { error, attempts } => {
            assert_eq!(attempts, 3);
            match error {
                ApiError::Status { status, message } => {
                    assert_eq!(status, 503);
                    assert_eq!(message, "PATCH unavailable");
                }
                other => panic!("expected status error, got {other:?}"),
            }
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn empty_strategy_list_fails_without_calling_anything() {
    let mut calls = 0;
    let outcome = submit_with_fallback(&[], &payload(), |_, _| {
        calls += 1;
        Ok(json!(null))
    });

    assert_eq!(calls, 0);
    assert!(!outcome.is_success());
}

#[test]
fn legacy_chain_order_is_put_post_patch() {
    assert_eq!(LEGACY_STATS_CHAIN, [Verb::Put, Verb::Post, Verb::Patch]);
}
