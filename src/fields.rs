use once_cell::sync::Lazy;

use crate::sport_api::SportConfig;

/// Statuses the backend accepts for a match, in display order.
pub const MATCH_STATUSES: [&str; 7] = [
    "upcoming",
    "live",
    "halftime",
    "finished",
    "postponed",
    "cancelled",
    "penalties",
];

/// Men's artistic apparatus, used when a gymnastics sport config
/// carries no apparatus list of its own.
static DEFAULT_APPARATUS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "floor_exercise",
        "pommel_horse",
        "still_rings",
        "vault",
        "parallel_bars",
        "horizontal_bar",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

pub const LANDING_QUALITIES: [&str; 4] = ["poor", "fair", "good", "stuck"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Match,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
    Select,
    DateTime,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub input: InputKind,
    pub options: Vec<String>,
}

impl FieldDescriptor {
    fn new(key: &str, label: &str, input: InputKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input,
            options: Vec::new(),
        }
    }

    fn select(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input: InputKind::Select,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Which fixed schema a sport config maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportKind {
    Football,
    Basketball,
    Gymnastics,
    Other,
}

impl SportKind {
    pub fn from_config(config: &SportConfig) -> Self {
        let name = config.name.trim().to_lowercase();
        if name.contains("football") || name.contains("soccer") {
            SportKind::Football
        } else if name.contains("basketball") {
            SportKind::Basketball
        } else if name.contains("gymnastic") {
            SportKind::Gymnastics
        } else {
            SportKind::Other
        }
    }
}

/// The ordered field list for an edit screen. Pure and total: every
/// sport name yields a non-empty list; unrecognized sports get the
/// common set plus whatever the capability flags add.
pub fn fields_for(entity: EntityKind, config: &SportConfig) -> Vec<FieldDescriptor> {
    match entity {
        EntityKind::Match => match_fields(config),
        EntityKind::Player => player_fields(config),
    }
}

fn match_fields(config: &SportConfig) -> Vec<FieldDescriptor> {
    let mut fields = common_match_fields();

    match SportKind::from_config(config) {
        SportKind::Football => {
            for (key, label) in [
                ("red_cards", "Red Cards"),
                ("yellow_cards", "Yellow Cards"),
                ("fouls", "Fouls"),
                ("corners", "Corners"),
                ("offsides", "Offsides"),
                ("shots_on_target", "Shots on Target"),
                ("total_shots", "Total Shots"),
                ("total_goals", "Total Goals"),
            ] {
                fields.push(FieldDescriptor::new(key, label, InputKind::Number));
            }
            if config.penalty_kicks {
                fields.push(FieldDescriptor::new(
                    "penalty_attempts",
                    "Penalty Attempts",
                    InputKind::Number,
                ));
                fields.push(FieldDescriptor::new(
                    "penalty_goals",
                    "Penalty Goals",
                    InputKind::Number,
                ));
            }
        }
        SportKind::Basketball => {
            for (key, label) in [
                ("total_points", "Total Points"),
                ("field_goals", "Field Goals"),
                ("three_pointers", "Three Pointers"),
                ("free_throws", "Free Throws"),
                ("rebounds", "Rebounds"),
                ("offensive_rebounds", "Offensive Rebounds"),
                ("defensive_rebounds", "Defensive Rebounds"),
                ("assists", "Assists"),
                ("steals", "Steals"),
                ("blocks", "Blocks"),
                ("turnovers", "Turnovers"),
            ] {
                fields.push(FieldDescriptor::new(key, label, InputKind::Number));
            }
            if config.has_quarters {
                for quarter in 1..=4 {
                    fields.push(FieldDescriptor::new(
                        &format!("quarter_{quarter}_points"),
                        &format!("Q{quarter} Points"),
                        InputKind::Number,
                    ));
                }
            }
        }
        SportKind::Gymnastics => {
            for apparatus in apparatus_list(config) {
                let title = apparatus_label(apparatus);
                for (suffix, label) in [
                    ("difficulty", "Difficulty"),
                    ("execution", "Execution"),
                    ("combined", "Combined"),
                    ("deductions", "Deductions"),
                ] {
                    fields.push(FieldDescriptor::new(
                        &format!("{apparatus}_{suffix}"),
                        &format!("{title} {label}"),
                        InputKind::Number,
                    ));
                }
                fields.push(FieldDescriptor::new(
                    &format!("{apparatus}_completed"),
                    &format!("{title} Completed"),
                    InputKind::Checkbox,
                ));
            }
            for (key, label) in [
                ("total_difficulty", "Total Difficulty"),
                ("total_execution", "Total Execution"),
                ("total_score", "Total Score"),
                ("total_deductions", "Total Deductions"),
            ] {
                fields.push(FieldDescriptor::new(key, label, InputKind::Number));
            }
        }
        SportKind::Other => {
            if config.is_team_sport {
                fields.push(FieldDescriptor::new("red_cards", "Red Cards", InputKind::Number));
                fields.push(FieldDescriptor::new(
                    "yellow_cards",
                    "Yellow Cards",
                    InputKind::Number,
                ));
            }
            if config.fouls_penalty {
                fields.push(FieldDescriptor::new("fouls", "Fouls", InputKind::Number));
            }
            if config.corner_kicks {
                fields.push(FieldDescriptor::new("corners", "Corners", InputKind::Number));
            }
        }
    }

    fields
}

fn common_match_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::select("status", "Status", &MATCH_STATUSES),
        FieldDescriptor::new("match_date", "Match Date", InputKind::DateTime),
        FieldDescriptor::new("start_date", "Start Date", InputKind::DateTime),
        FieldDescriptor::new("is_active", "Active", InputKind::Checkbox),
        FieldDescriptor::new("replay", "Replay", InputKind::Checkbox),
        FieldDescriptor::new("week", "Week", InputKind::Number),
        FieldDescriptor::new("group_name", "Group", InputKind::Text),
    ]
}

fn player_fields(config: &SportConfig) -> Vec<FieldDescriptor> {
    match SportKind::from_config(config) {
        SportKind::Football => [
            ("goals", "Goals"),
            ("assists", "Assists"),
            ("yellow_cards", "Yellow Cards"),
            ("red_cards", "Red Cards"),
            ("fouls_committed", "Fouls Committed"),
            ("minutes_played", "Minutes Played"),
        ]
        .iter()
        .map(|(key, label)| FieldDescriptor::new(key, label, InputKind::Number))
        .collect(),
        SportKind::Basketball => [
            ("points", "Points"),
            ("rebounds", "Rebounds"),
            ("assists", "Assists"),
            ("steals", "Steals"),
            ("blocks", "Blocks"),
            ("turnovers", "Turnovers"),
            ("minutes_played", "Minutes Played"),
        ]
        .iter()
        .map(|(key, label)| FieldDescriptor::new(key, label, InputKind::Number))
        .collect(),
        SportKind::Gymnastics => {
            let mut fields: Vec<FieldDescriptor> = [
                ("difficulty_score", "Difficulty Score"),
                ("execution_score", "Execution Score"),
                ("total_score", "Total Score"),
                ("deductions", "Deductions"),
                ("fall_count", "Falls"),
                ("routine_duration", "Routine Duration (s)"),
            ]
            .iter()
            .map(|(key, label)| FieldDescriptor::new(key, label, InputKind::Number))
            .collect();
            fields.push(FieldDescriptor::new(
                "routine_completion",
                "Routine Completed",
                InputKind::Checkbox,
            ));
            let apparatus: Vec<&str> = apparatus_list(config)
                .iter()
                .map(|s| s.as_str())
                .collect();
            fields.push(FieldDescriptor::select(
                "apparatus_performed",
                "Apparatus",
                &apparatus,
            ));
            fields.push(FieldDescriptor::select(
                "landing_quality",
                "Landing",
                &LANDING_QUALITIES,
            ));
            fields
        }
        SportKind::Other => {
            let mut fields = vec![FieldDescriptor::new(
                "minutes_played",
                "Minutes Played",
                InputKind::Number,
            )];
            if config.is_team_sport {
                fields.push(FieldDescriptor::new(
                    "yellow_cards",
                    "Yellow Cards",
                    InputKind::Number,
                ));
                fields.push(FieldDescriptor::new("red_cards", "Red Cards", InputKind::Number));
            }
            fields
        }
    }
}

fn apparatus_list(config: &SportConfig) -> &[String] {
    if config.apparatus_list.is_empty() {
        &DEFAULT_APPARATUS
    } else {
        &config.apparatus_list
    }
}

fn apparatus_label(key: &str) -> String {
    let mut out = String::new();
    for part in key.split('_') {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
