use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::http_client::{ApiClient, ApiError, Verb};
use crate::submit::{SubmitOutcome, submit_with_fallback};
use crate::wire::result_rows;

/// Verb order for the legacy statistics endpoint. Its router rejects
/// verbs inconsistently across deployments, so updates walk this chain
/// until one lands.
pub const LEGACY_STATS_CHAIN: [Verb; 3] = [Verb::Put, Verb::Post, Verb::Patch];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team: Option<u64>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("player {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Per-match statistics record for one player. Like `Match`, the
/// sport-specific columns live in a flattened bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "match", default)]
    pub match_id: u64,
    #[serde(default)]
    pub player: u64,
    #[serde(default)]
    pub team: Option<u64>,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl PlayerStats {
    /// A zero-valued record for a player with no stats row yet. The
    /// form seeds every field to its default from an empty bag.
    pub fn empty(match_id: u64, player: u64, team: Option<u64>) -> Self {
        Self {
            id: None,
            match_id,
            player,
            team,
            stats: Map::new(),
        }
    }

    pub fn form_values(&self) -> Map<String, Value> {
        self.stats.clone()
    }
}

pub fn parse_players(value: &Value) -> Vec<Player> {
    result_rows(value)
        .into_iter()
        .filter_map(|row| serde_json::from_value::<Player>(row).ok())
        .collect()
}

pub fn parse_player_stats(value: &Value) -> Option<PlayerStats> {
    serde_json::from_value::<PlayerStats>(value.clone()).ok()
}

pub fn list_players(client: &ApiClient, team: Option<u64>) -> Result<Vec<Player>, ApiError> {
    let path = match team {
        Some(id) => format!("players/?team={id}"),
        None => "players/".to_string(),
    };
    let value = client.get(&path)?;
    Ok(parse_players(&value))
}

pub fn create_player(client: &ApiClient, payload: &Value) -> Result<Player, ApiError> {
    let value = client.send(Verb::Post, "players/", Some(payload))?;
    serde_json::from_value::<Player>(value).map_err(|err| ApiError::Status {
        status: 200,
        message: format!("created player payload did not parse: {err}"),
    })
}

/// Looks up the stats row for one player in one match. A missing row
/// is not an error here: the caller gets a zero-valued record to edit
/// and the eventual submit creates it.
pub fn get_or_create_stats(
    client: &ApiClient,
    match_id: u64,
    player: u64,
    team: Option<u64>,
) -> Result<PlayerStats, ApiError> {
    let path = format!("player-stats/?match={match_id}&player={player}");
    let value = match client.get(&path) {
        Ok(value) => value,
        Err(ApiError::NotFound) => return Ok(PlayerStats::empty(match_id, player, team)),
        Err(err) => return Err(err),
    };
    let row = result_rows(&value)
        .into_iter()
        .find_map(|row| parse_player_stats(&row));
    Ok(row.unwrap_or_else(|| PlayerStats::empty(match_id, player, team)))
}

/// Submits a stats payload through the legacy verb chain. PUT and
/// PATCH go to the detail route when the record already has an id;
/// POST always targets the collection.
pub fn submit_stats(client: &ApiClient, stats: &PlayerStats, fields: Map<String, Value>) -> SubmitOutcome {
    let mut payload = fields;
    payload.insert("match".to_string(), json!(stats.match_id));
    payload.insert("player".to_string(), json!(stats.player));
    if let Some(team) = stats.team {
        payload.insert("team".to_string(), json!(team));
    }
    let payload = Value::Object(payload);

    let detail = stats.id.map(|id| format!("player-stats/{id}/"));
    submit_with_fallback(&LEGACY_STATS_CHAIN, &payload, |verb, body| {
        let path = match (verb, &detail) {
            (Verb::Put | Verb::Patch, Some(path)) => path.as_str(),
            _ => "player-stats/",
        };
        client.send(verb, path, Some(body))
    })
}
