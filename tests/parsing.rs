use serde_json::json;

use ngsc_terminal::gym_api::{
    parse_clock_snapshot, parse_judge_panels, parse_rankings, parse_rotations, parse_sessions,
};
use ngsc_terminal::http_client::{ApiError, parse_validation_body};
use ngsc_terminal::match_api::{MatchStatus, parse_match, parse_match_list};
use ngsc_terminal::player_api::parse_player_stats;
use ngsc_terminal::sport_api::parse_sports;
use ngsc_terminal::wire::result_rows;

#[test]
fn match_lists_parse_from_bare_arrays_and_envelopes() {
    let bare = json!([
        { "id": 1, "status": "live" },
        { "id": 2, "status": "upcoming" }
    ]);
    let enveloped = json!({ "results": [
        { "id": 1, "status": "live" },
        { "id": 2, "status": "upcoming" }
    ]});

    let from_bare = parse_match_list(&bare);
    let from_envelope = parse_match_list(&enveloped);
    assert_eq!(from_bare.len(), 2);
    assert_eq!(from_envelope.len(), 2);
    assert_eq!(from_bare[0].id, from_envelope[0].id);
    assert_eq!(from_bare[0].status, MatchStatus::Live);
}

#[test]
fn unknown_status_strings_fold_onto_the_canonical_set() {
    let m = parse_match(&json!({ "id": 5, "status": "in_progress" })).expect("match");
    assert_eq!(m.status, MatchStatus::Live);

    let m = parse_match(&json!({ "id": 6, "status": "completed" })).expect("match");
    assert_eq!(m.status, MatchStatus::Finished);

    // A status the backend never documented still yields a row.
    let m = parse_match(&json!({ "id": 7, "status": "weird" })).expect("match");
    assert_eq!(m.status, MatchStatus::Upcoming);

    let m = parse_match(&json!({ "id": 8 })).expect("match");
    assert_eq!(m.status, MatchStatus::Upcoming);
}

#[test]
fn sport_specific_columns_land_in_the_stats_bag() {
    let m = parse_match(&json!({
        "id": 3,
        "status": "finished",
        "week": 4,
        "total_goals": 3,
        "corners": 7
    }))
    .expect("match");

    assert_eq!(m.week, Some(4));
    let values = m.form_values();
    assert_eq!(values.get("total_goals"), Some(&json!(3)));
    assert_eq!(values.get("corners"), Some(&json!(7)));
    assert_eq!(values.get("status"), Some(&json!("finished")));
}

#[test]
fn match_teams_use_the_match_rename() {
    let m = parse_match(&json!({
        "id": 9,
        "status": "live",
        "match_teams": [
            { "id": 21, "match": 9, "team": 4, "team_name": "Lions", "score": 2.0 },
            { "id": 22, "match": 9, "team": 5, "score": 1.0 }
        ]
    }))
    .expect("match");

    assert_eq!(m.match_teams.len(), 2);
    assert_eq!(m.match_teams[0].match_id, 9);
    assert_eq!(m.title(), "Lions vs team 5");
    assert_eq!(m.score_line(), "2-1");
}

#[test]
fn player_stats_rename_and_flatten() {
    let stats = parse_player_stats(&json!({
        "id": 44,
        "match": 9,
        "player": 3,
        "team": 4,
        "goals": 2,
        "minutes_played": 88
    }))
    .expect("stats");

    assert_eq!(stats.match_id, 9);
    assert_eq!(stats.id, Some(44));
    assert_eq!(stats.form_values().get("goals"), Some(&json!(2)));
}

#[test]
fn sports_parse_with_nested_config() {
    let sports = parse_sports(&json!({ "results": [
        {
            "id": 1,
            "name": "Gymnastics",
            "is_team_sport": false,
            "sport_config": { "apparatus_list": ["vault"], "routine_time_limit": 90 }
        }
    ]}));

    assert_eq!(sports.len(), 1);
    let config = sports[0].config();
    assert_eq!(config.name, "Gymnastics");
    assert_eq!(config.apparatus_list, vec!["vault".to_string()]);
    assert_eq!(config.routine_time_limit, Some(90));
}

#[test]
fn clock_snapshot_reads_the_flat_key_variant() {
    let snapshot = parse_clock_snapshot(&json!({
        "running": true,
        "time_remaining": 90,
        "current_rotation": 2,
        "total_rotations": 6,
        "current_apparatus": "vault",
        "in_timeout": false
    }));

    assert!(snapshot.running);
    assert_eq!(snapshot.time_remaining, 90);
    assert_eq!(snapshot.current_rotation, 2);
    assert_eq!(snapshot.total_rotations, 6);
    assert_eq!(snapshot.current_apparatus.as_deref(), Some("vault"));
    assert!(snapshot.active_routine.is_none());
}

#[test]
fn clock_snapshot_reads_the_enveloped_alias_variant() {
    let snapshot = parse_clock_snapshot(&json!({ "clock": {
        "is_running": "true",
        "seconds_remaining": "45",
        "current_period": 3,
        "rotations": 4,
        "timeout_active": true,
        "current_routine": { "player_id": 7, "name": "A. Lee", "apparatus": "pommel_horse" }
    }}));

    assert!(snapshot.running);
    assert_eq!(snapshot.time_remaining, 45);
    assert_eq!(snapshot.current_rotation, 3);
    assert_eq!(snapshot.total_rotations, 4);
    assert!(snapshot.in_timeout);
    let routine = snapshot.active_routine.expect("routine");
    assert_eq!(routine.player, Some(7));
    assert_eq!(routine.player_name.as_deref(), Some("A. Lee"));
    assert_eq!(routine.apparatus.as_deref(), Some("pommel_horse"));
}

#[test]
fn clock_snapshot_defaults_when_keys_are_missing() {
    let snapshot = parse_clock_snapshot(&json!({}));
    assert!(!snapshot.running);
    assert_eq!(snapshot.time_remaining, 0);
    assert!(snapshot.active_routine.is_none());
}

#[test]
fn rankings_tolerate_string_numbers_and_missing_ranks() {
    let rows = parse_rankings(&json!({ "results": [
        {
            "rank": 1,
            "player_name": "A. Lee",
            "difficulty_score": "5.8",
            "execution_score": 8.45,
            "total_score": "14.25"
        },
        {
            "player_name": "B. Cruz",
            "total": 13.9
        }
    ]}));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].difficulty, 5.8);
    assert_eq!(rows[0].total, 14.25);
    // Row without a rank falls back to its list position.
    assert_eq!(rows[1].rank, 2);
    assert_eq!(rows[1].total, 13.9);
    assert_eq!(rows[1].difficulty, 0.0);
}

#[test]
fn sessions_parse_with_aliased_keys() {
    let rows = parse_sessions(&json!({ "results": [
        { "id": 1, "name": "Qualification", "status": "finished", "start_time": "2025-03-04T09:00:00Z" },
        { "session_id": 2, "session_name": "Apparatus Final", "state": "upcoming" }
    ]}));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, Some(1));
    assert_eq!(rows[0].name, "Qualification");
    assert_eq!(rows[0].start_time.as_deref(), Some("2025-03-04T09:00:00Z"));
    assert_eq!(rows[1].id, Some(2));
    assert_eq!(rows[1].name, "Apparatus Final");
    assert_eq!(rows[1].status.as_deref(), Some("upcoming"));
}

#[test]
fn rotation_schedule_falls_back_to_list_position() {
    let rows = parse_rotations(&json!([
        { "number": 3, "apparatus": "vault", "status": "active", "duration_seconds": 600 },
        { "apparatus": "parallel_bars" }
    ]));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].number, 3);
    assert_eq!(rows[0].duration_seconds, Some(600));
    // No number reported: the list position stands in.
    assert_eq!(rows[1].number, 2);
    assert_eq!(rows[1].apparatus.as_deref(), Some("parallel_bars"));
    assert!(rows[1].status.is_none());
}

#[test]
fn judge_panels_accept_string_and_object_judges() {
    let rows = parse_judge_panels(&json!({ "results": [
        {
            "apparatus": "pommel_horse",
            "head_judge": "M. Silva",
            "judges": ["A. Novak", { "name": "K. Tanaka" }, ""]
        },
        { "apparatus": "vault", "panel": [ { "judge_name": "L. Meyer" } ] }
    ]}));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].head_judge.as_deref(), Some("M. Silva"));
    assert_eq!(rows[0].judges, vec!["A. Novak".to_string(), "K. Tanaka".to_string()]);
    assert_eq!(rows[1].judges, vec!["L. Meyer".to_string()]);
    assert!(rows[1].head_judge.is_none());
}

#[test]
fn validation_bodies_become_field_maps() {
    let body = r#"{ "week": ["must be positive"], "status": "invalid choice" }"#;
    match parse_validation_body(body) {
        Some(ApiError::Validation { fields }) => {
            assert_eq!(fields.get("week"), Some(&vec!["must be positive".to_string()]));
            assert_eq!(fields.get("status"), Some(&vec!["invalid choice".to_string()]));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn detail_only_bodies_are_not_validation_errors() {
    assert!(parse_validation_body(r#"{ "detail": "Not found." }"#).is_none());
    assert!(parse_validation_body("halt and catch fire").is_none());
    assert!(parse_validation_body("").is_none());
}

#[test]
fn result_rows_cover_every_envelope_shape() {
    let rows = json!([{ "id": 1 }]);
    assert_eq!(result_rows(&rows).len(), 1);
    assert_eq!(result_rows(&json!({ "results": [ { "id": 1 } ] })).len(), 1);
    assert_eq!(result_rows(&json!({ "data": [ { "id": 1 }, { "id": 2 } ] })).len(), 2);
    assert_eq!(result_rows(&json!({ "items": [] })).len(), 0);
    assert_eq!(result_rows(&json!({ "count": 3 })).len(), 0);
    assert_eq!(result_rows(&json!(null)).len(), 0);
}
