use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::http_client::{ApiClient, ApiError, Verb};
use crate::submit::{SubmitOutcome, submit_with_fallback};
use crate::wire::result_rows;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Halftime,
    Finished,
    Postponed,
    Cancelled,
    Penalties,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Halftime => "halftime",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::Penalties => "penalties",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "upcoming" | "scheduled" => Some(MatchStatus::Upcoming),
            "live" | "in_progress" => Some(MatchStatus::Live),
            "halftime" | "half_time" => Some(MatchStatus::Halftime),
            "finished" | "completed" => Some(MatchStatus::Finished),
            "postponed" => Some(MatchStatus::Postponed),
            "cancelled" | "canceled" => Some(MatchStatus::Cancelled),
            "penalties" => Some(MatchStatus::Penalties),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTeam {
    pub id: u64,
    #[serde(rename = "match")]
    pub match_id: u64,
    pub team: u64,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub yellow_cards: u32,
}

impl MatchTeam {
    pub fn display_name(&self) -> String {
        self.team_name
            .clone()
            .unwrap_or_else(|| format!("team {}", self.team))
    }
}

/// A match as the backend reports it. The fixed columns every sport
/// shares are typed; the sport-specific statistics bag stays a
/// flattened map whose shape the field catalog decides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Match {
    pub id: u64,
    #[serde(default, deserialize_with = "de_status")]
    pub status: MatchStatus,
    #[serde(default)]
    pub match_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub replay: bool,
    #[serde(default)]
    pub week: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub sport: Option<u64>,
    #[serde(default)]
    pub league: Option<u64>,
    #[serde(default)]
    pub venue: Option<u64>,
    #[serde(default)]
    pub match_teams: Vec<MatchTeam>,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        matches!(self.status, MatchStatus::Live | MatchStatus::Halftime)
    }

    pub fn title(&self) -> String {
        let mut names: Vec<String> = self
            .match_teams
            .iter()
            .map(|mt| mt.display_name())
            .collect();
        if names.is_empty() {
            names.push(format!("match {}", self.id));
        }
        names.join(" vs ")
    }

    pub fn score_line(&self) -> String {
        if self.match_teams.is_empty() {
            return "-".to_string();
        }
        self.match_teams
            .iter()
            .map(|mt| {
                if mt.score.fract() == 0.0 {
                    format!("{}", mt.score as i64)
                } else {
                    format!("{:.3}", mt.score)
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Values the form builder seeds from: the typed columns merged
    /// with the statistics bag.
    pub fn form_values(&self) -> Map<String, Value> {
        let mut out = self.stats.clone();
        out.insert("status".to_string(), json!(self.status.as_str()));
        if let Some(date) = &self.match_date {
            out.insert("match_date".to_string(), json!(date));
        }
        if let Some(date) = &self.start_date {
            out.insert("start_date".to_string(), json!(date));
        }
        out.insert("is_active".to_string(), json!(self.is_active));
        out.insert("replay".to_string(), json!(self.replay));
        if let Some(week) = self.week {
            out.insert("week".to_string(), json!(week));
        }
        if let Some(group) = &self.group_name {
            out.insert("group_name".to_string(), json!(group));
        }
        out
    }
}

/// Some deployments report status variants the enum does not carry
/// ("in_progress", "completed"); fold them onto the canonical set
/// instead of dropping the row.
fn de_status<'de, D>(deserializer: D) -> Result<MatchStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(MatchStatus::parse)
        .unwrap_or_default())
}

pub fn parse_match(value: &Value) -> Option<Match> {
    serde_json::from_value::<Match>(value.clone()).ok()
}

pub fn parse_match_list(value: &Value) -> Vec<Match> {
    result_rows(value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<Match>(row).ok())
        .collect()
}

pub fn list_matches(client: &ApiClient, sport: Option<u64>) -> Result<Vec<Match>, ApiError> {
    let path = match sport {
        Some(id) => format!("matches/?sport={id}"),
        None => "matches/".to_string(),
    };
    let value = client.get(&path)?;
    Ok(parse_match_list(&value))
}

pub fn get_match(client: &ApiClient, match_id: u64) -> Result<Match, ApiError> {
    let value = client.get(&format!("matches/{match_id}/"))?;
    parse_match(&value).ok_or(ApiError::Status {
        status: 200,
        message: format!("match {match_id} payload did not parse"),
    })
}

pub fn create_match(client: &ApiClient, payload: &Value) -> Result<Match, ApiError> {
    let value = client.send(Verb::Post, "matches/", Some(payload))?;
    parse_match(&value).ok_or(ApiError::Status {
        status: 200,
        message: "created match payload did not parse".to_string(),
    })
}

/// Match updates go out over a single PATCH; there is no fallback
/// chain here.
pub fn patch_match(client: &ApiClient, match_id: u64, payload: &Value) -> SubmitOutcome {
    let path = format!("matches/{match_id}/");
    submit_with_fallback(&[Verb::Patch], payload, |verb, body| {
        client.send(verb, &path, Some(body))
    })
}

pub fn patch_match_team(client: &ApiClient, match_team_id: u64, payload: &Value) -> SubmitOutcome {
    let path = format!("match-teams/{match_team_id}/");
    submit_with_fallback(&[Verb::Patch], payload, |verb, body| {
        client.send(verb, &path, Some(body))
    })
}

pub fn create_match_team(client: &ApiClient, payload: &Value) -> Result<MatchTeam, ApiError> {
    let value = client.send(Verb::Post, "match-teams/", Some(payload))?;
    serde_json::from_value::<MatchTeam>(value).map_err(|err| ApiError::Status {
        status: 200,
        message: format!("created match-team payload did not parse: {err}"),
    })
}
