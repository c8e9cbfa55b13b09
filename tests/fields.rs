use ngsc_terminal::fields::{EntityKind, FieldDescriptor, InputKind, fields_for};
use ngsc_terminal::sport_api::SportConfig;

fn config(name: &str) -> SportConfig {
    SportConfig {
        name: name.to_string(),
        ..SportConfig::default()
    }
}

fn keys(fields: &[FieldDescriptor]) -> Vec<&str> {
    fields.iter().map(|f| f.key.as_str()).collect()
}

const COMMON: [&str; 7] = [
    "status",
    "match_date",
    "start_date",
    "is_active",
    "replay",
    "week",
    "group_name",
];

#[test]
fn football_match_catalog_is_exact() {
    let fields = fields_for(EntityKind::Match, &config("Football"));
    let expected: Vec<&str> = COMMON
        .iter()
        .chain(
            [
                "red_cards",
                "yellow_cards",
                "fouls",
                "corners",
                "offsides",
                "shots_on_target",
                "total_shots",
                "total_goals",
            ]
            .iter(),
        )
        .copied()
        .collect();
    assert_eq!(keys(&fields), expected);
}

#[test]
fn football_penalty_fields_present_iff_flag_set() {
    let without = fields_for(EntityKind::Match, &config("Football"));
    assert!(!keys(&without).contains(&"penalty_attempts"));

    let mut with_flag = config("Football");
    with_flag.penalty_kicks = true;
    let with = fields_for(EntityKind::Match, &with_flag);
    let with_keys = keys(&with);
    assert!(with_keys.contains(&"penalty_attempts"));
    assert!(with_keys.contains(&"penalty_goals"));
    assert_eq!(with.len(), without.len() + 2);
}

#[test]
fn basketball_quarter_fields_follow_has_quarters() {
    let plain = fields_for(EntityKind::Match, &config("Basketball"));
    assert!(!keys(&plain).contains(&"quarter_1_points"));

    let mut quartered = config("Basketball");
    quartered.has_quarters = true;
    let fields = fields_for(EntityKind::Match, &quartered);
    let field_keys = keys(&fields);
    for quarter in 1..=4 {
        let key = format!("quarter_{quarter}_points");
        assert!(field_keys.contains(&key.as_str()), "missing {key}");
    }
}

#[test]
fn gymnastics_uses_config_apparatus_list() {
    let mut cfg = config("Gymnastics");
    cfg.apparatus_list = vec!["vault".to_string(), "uneven_bars".to_string()];
    let fields = fields_for(EntityKind::Match, &cfg);
    let field_keys = keys(&fields);

    for suffix in ["difficulty", "execution", "combined", "deductions", "completed"] {
        let key = format!("uneven_bars_{suffix}");
        assert!(field_keys.contains(&key.as_str()), "missing {key}");
    }
    assert!(field_keys.contains(&"total_score"));
    assert!(!field_keys.contains(&"pommel_horse_combined"));
}

#[test]
fn gymnastics_defaults_to_mens_six_apparatus() {
    let fields = fields_for(EntityKind::Match, &config("Gymnastics"));
    let field_keys = keys(&fields);
    for apparatus in [
        "floor_exercise",
        "pommel_horse",
        "still_rings",
        "vault",
        "parallel_bars",
        "horizontal_bar",
    ] {
        let key = format!("{apparatus}_combined");
        assert!(field_keys.contains(&key.as_str()), "missing {key}");
    }
}

#[test]
fn every_sport_gets_a_nonempty_catalog_with_the_common_fields() {
    for name in ["Football", "Basketball", "Gymnastics", "Cricket", ""] {
        let fields = fields_for(EntityKind::Match, &config(name));
        assert!(!fields.is_empty(), "empty catalog for {name:?}");
        let field_keys = keys(&fields);
        for common in COMMON {
            assert!(field_keys.contains(&common), "{name:?} missing {common}");
        }
    }
}

#[test]
fn unknown_sport_fields_follow_capability_flags() {
    let mut cfg = config("Korfball");
    cfg.is_team_sport = true;
    cfg.corner_kicks = true;
    let fields = fields_for(EntityKind::Match, &cfg);
    let field_keys = keys(&fields);
    assert!(field_keys.contains(&"red_cards"));
    assert!(field_keys.contains(&"yellow_cards"));
    assert!(field_keys.contains(&"corners"));
    assert!(!field_keys.contains(&"fouls"));
}

#[test]
fn status_field_is_a_select_with_all_statuses() {
    let fields = fields_for(EntityKind::Match, &config("Football"));
    let status = fields.iter().find(|f| f.key == "status").expect("status field");
    assert_eq!(status.input, InputKind::Select);
    assert_eq!(status.options.len(), 7);
    assert!(status.options.iter().any(|o| o == "penalties"));
}

#[test]
fn player_catalogs_are_sport_keyed_and_total() {
    let football = fields_for(EntityKind::Player, &config("Football"));
    assert!(keys(&football).contains(&"goals"));

    let basketball = fields_for(EntityKind::Player, &config("Basketball"));
    assert!(keys(&basketball).contains(&"rebounds"));

    let gym = fields_for(EntityKind::Player, &config("Gymnastics"));
    let gym_keys = keys(&gym);
    assert!(gym_keys.contains(&"apparatus_performed"));
    assert!(gym_keys.contains(&"landing_quality"));
    assert!(gym_keys.contains(&"routine_completion"));

    let other = fields_for(EntityKind::Player, &config("Darts"));
    assert!(!other.is_empty());
}
