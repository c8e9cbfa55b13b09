use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use ngsc_terminal::fields::{EntityKind, fields_for};
use ngsc_terminal::form::{FieldValue, FormModel, parse_datetime_local};
use ngsc_terminal::sport_api::SportConfig;

fn football() -> SportConfig {
    SportConfig {
        name: "Football".to_string(),
        ..SportConfig::default()
    }
}

fn build(existing: Map<String, Value>) -> FormModel {
    FormModel::build(fields_for(EntityKind::Match, &football()), &existing)
}

#[test]
fn empty_seed_uses_per_kind_defaults() {
    let form = build(Map::new());

    match &form.control("total_goals").expect("control").value {
        FieldValue::Number(n) => assert_eq!(*n, 0.0),
        other => panic!("expected number, got {other:?}"),
    }
    match &form.control("is_active").expect("control").value {
        FieldValue::Checkbox(flag) => assert!(!flag),
        other => panic!("expected checkbox, got {other:?}"),
    }
    match &form.control("group_name").expect("control").value {
        FieldValue::Text(s) => assert!(s.is_empty()),
        other => panic!("expected text, got {other:?}"),
    }
    // Datetime defaults to "now", which must at least parse.
    match &form.control("match_date").expect("control").value {
        FieldValue::DateTime(s) => assert!(parse_datetime_local(s).is_some()),
        other => panic!("expected datetime, got {other:?}"),
    }
}

#[test]
fn unedited_round_trip_reproduces_existing_values() {
    let mut existing = Map::new();
    existing.insert("status".to_string(), json!("live"));
    existing.insert("week".to_string(), json!(3));
    existing.insert("is_active".to_string(), json!(true));
    existing.insert("total_goals".to_string(), json!(2));
    existing.insert("match_date".to_string(), json!("2025-03-04T20:00:00Z"));

    let form = build(existing);
    let out = form.serialize();

    assert_eq!(out.get("status"), Some(&json!("live")));
    assert_eq!(out.get("week"), Some(&json!(3)));
    assert_eq!(out.get("is_active"), Some(&json!(true)));
    assert_eq!(out.get("total_goals"), Some(&json!(2)));
    assert_eq!(out.get("match_date"), Some(&json!("2025-03-04T20:00:00Z")));
}

#[test]
fn negative_statistics_fail_validation_and_serialize_clamped() {
    let mut form = build(Map::new());
    let index = form
        .controls
        .iter()
        .position(|c| c.field.key == "total_goals")
        .expect("total_goals");
    assert!(form.set_input(index, "-3"));
    assert!(!form.validate());
    assert!(!form.control("total_goals").expect("control").errors.is_empty());

    let out = form.serialize();
    assert_eq!(out.get("total_goals"), Some(&json!(0)));
}

#[test]
fn status_is_required() {
    let mut form = build(Map::new());
    assert!(!form.validate(), "blank status should not validate");

    let index = form
        .controls
        .iter()
        .position(|c| c.field.key == "status")
        .expect("status");
    form.cycle_option(index, true);
    let week = form
        .controls
        .iter()
        .position(|c| c.field.key == "week")
        .expect("week");
    form.set_input(week, "1");
    assert!(form.validate());
}

#[test]
fn unparsable_number_input_is_rejected_and_value_kept() {
    let mut existing = Map::new();
    existing.insert("week".to_string(), json!(4));
    let mut form = build(existing);
    let index = form
        .controls
        .iter()
        .position(|c| c.field.key == "week")
        .expect("week");

    assert!(!form.set_input(index, "soon"));
    match &form.controls[index].value {
        FieldValue::Number(n) => assert_eq!(*n, 4.0),
        other => panic!("expected number, got {other:?}"),
    }
    assert!(!form.controls[index].errors.is_empty());
}

#[test]
fn cycle_option_walks_the_catalog_options() {
    let mut form = build(Map::new());
    let index = form
        .controls
        .iter()
        .position(|c| c.field.key == "status")
        .expect("status");

    form.cycle_option(index, true);
    let first = match &form.controls[index].value {
        FieldValue::Text(s) => s.clone(),
        other => panic!("expected text, got {other:?}"),
    };
    assert_eq!(first, "upcoming");

    form.cycle_option(index, true);
    form.cycle_option(index, false);
    match &form.controls[index].value {
        FieldValue::Text(s) => assert_eq!(s, "upcoming"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn server_field_errors_land_on_matching_controls() {
    let mut form = build(Map::new());
    let mut errors = BTreeMap::new();
    errors.insert(
        "match_date".to_string(),
        vec!["invalid datetime".to_string()],
    );
    errors.insert("nonexistent".to_string(), vec!["ignored".to_string()]);
    form.apply_server_errors(&errors);

    assert_eq!(
        form.control("match_date").expect("control").errors,
        vec!["invalid datetime".to_string()]
    );
    assert!(form.has_errors());
}

#[test]
fn malformed_server_datetime_fails_validation_instead_of_crashing() {
    // A corrupt timestamp with a multibyte character straddling the
    // minute-precision cut point must seed without panicking.
    let mut existing = Map::new();
    existing.insert("match_date".to_string(), json!("2025-03-04T20:0é:00Z"));
    existing.insert("status".to_string(), json!("live"));
    let mut form = build(existing);

    match &form.control("match_date").expect("control").value {
        FieldValue::DateTime(s) => assert!(parse_datetime_local(s).is_none()),
        other => panic!("expected datetime, got {other:?}"),
    }
    assert!(!form.validate());
    assert!(!form.control("match_date").expect("control").errors.is_empty());
}

#[test]
fn datetime_local_edit_serializes_to_wire_format() {
    let mut form = build(Map::new());
    let index = form
        .controls
        .iter()
        .position(|c| c.field.key == "start_date")
        .expect("start_date");
    assert!(form.set_input(index, "2025-03-04T20:15"));

    let out = form.serialize();
    assert_eq!(out.get("start_date"), Some(&json!("2025-03-04T20:15:00Z")));
}
