use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{ApiClient, ApiError, Verb};
use crate::wire::result_rows;

/// Backend-supplied descriptor of a sport's rules. Carried through
/// navigation from the sports list to every downstream screen; the
/// field catalog keys off it and nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SportConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scoring_system: Option<String>,
    #[serde(default)]
    pub is_team_sport: bool,
    #[serde(default)]
    pub penalty_kicks: bool,
    #[serde(default)]
    pub fouls_penalty: bool,
    #[serde(default)]
    pub corner_kicks: bool,
    #[serde(default)]
    pub has_quarters: bool,
    #[serde(default)]
    pub apparatus_list: Vec<String>,
    #[serde(default)]
    pub routine_time_limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sport {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_team_sport: bool,
    #[serde(default)]
    pub sport_config: SportConfig,
}

impl Sport {
    /// Config as passed downstream: the sport's name and team flag
    /// folded in, since the backend omits them from the config bag.
    pub fn config(&self) -> SportConfig {
        let mut config = self.sport_config.clone();
        if config.name.trim().is_empty() {
            config.name = self.name.clone();
        }
        config.is_team_sport = config.is_team_sport || self.is_team_sport;
        config
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub displayname: Option<String>,
}

pub fn list_sports(client: &ApiClient) -> Result<Vec<Sport>, ApiError> {
    let value = client.get("sports/")?;
    Ok(parse_sports(&value))
}

pub fn parse_sports(value: &Value) -> Vec<Sport> {
    result_rows(value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<Sport>(row).ok())
        .collect()
}

pub fn create_sport(client: &ApiClient, payload: &Value) -> Result<Value, ApiError> {
    client.send(Verb::Post, "sports/", Some(payload))
}

pub fn create_venue(client: &ApiClient, payload: &Value) -> Result<Value, ApiError> {
    client.send(Verb::Post, "venues/", Some(payload))
}

pub fn create_league(client: &ApiClient, payload: &Value) -> Result<Value, ApiError> {
    client.send(Verb::Post, "leagues/", Some(payload))
}

pub fn list_teams(client: &ApiClient, sport: Option<u64>) -> Result<Vec<Team>, ApiError> {
    let path = match sport {
        Some(id) => format!("teams/?sport={id}"),
        None => "teams/".to_string(),
    };
    let value = client.get(&path)?;
    Ok(result_rows(&value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<Team>(row).ok())
        .collect())
}

pub fn create_team(client: &ApiClient, payload: &Value) -> Result<Value, ApiError> {
    client.send(Verb::Post, "teams/", Some(payload))
}
