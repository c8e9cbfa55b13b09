use serde_json::{Value, json};

use crate::http_client::{ApiClient, ApiError, Verb};
use crate::wire::{pick_bool, pick_f64, pick_string, pick_u64, result_rows};

/// Commands the competition clock accepts. The server is the sole
/// authority on timing; every command answers with a fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockAction {
    Initialize,
    Start,
    Pause,
    Resume,
    Reset,
    Status,
    StartRoutine { player: u64, apparatus: String },
    StopRoutine,
    CallTimeout { team: u64, duration_seconds: u32 },
    EndTimeout,
    AdvanceRotation,
}

impl ClockAction {
    fn path_segment(&self) -> &'static str {
        match self {
            ClockAction::Initialize => "clock/initialize/",
            ClockAction::Start => "clock/start/",
            ClockAction::Pause => "clock/pause/",
            ClockAction::Resume => "clock/resume/",
            ClockAction::Reset => "clock/reset/",
            ClockAction::Status => "clock/status/",
            ClockAction::StartRoutine { .. } => "routine/start/",
            ClockAction::StopRoutine => "routine/stop/",
            ClockAction::CallTimeout { .. } => "timeout/call/",
            ClockAction::EndTimeout => "timeout/end/",
            ClockAction::AdvanceRotation => "rotation/advance/",
        }
    }

    fn body(&self) -> Option<Value> {
        match self {
            ClockAction::StartRoutine { player, apparatus } => {
                Some(json!({ "player": player, "apparatus": apparatus }))
            }
            ClockAction::CallTimeout {
                team,
                duration_seconds,
            } => Some(json!({ "team": team, "duration_seconds": duration_seconds })),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClockAction::Initialize => "initialize",
            ClockAction::Start => "start",
            ClockAction::Pause => "pause",
            ClockAction::Resume => "resume",
            ClockAction::Reset => "reset",
            ClockAction::Status => "status",
            ClockAction::StartRoutine { .. } => "start routine",
            ClockAction::StopRoutine => "stop routine",
            ClockAction::CallTimeout { .. } => "call timeout",
            ClockAction::EndTimeout => "end timeout",
            ClockAction::AdvanceRotation => "advance rotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoutine {
    pub player: Option<u64>,
    pub player_name: Option<String>,
    pub apparatus: Option<String>,
}

/// What the server reports about the clock. Seconds remaining seed
/// the local countdown mirror; nothing here is extrapolated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockSnapshot {
    pub running: bool,
    pub time_remaining: u32,
    pub current_rotation: u32,
    pub total_rotations: u32,
    pub current_apparatus: Option<String>,
    pub in_timeout: bool,
    pub active_routine: Option<ActiveRoutine>,
}

/// Deployments disagree on key names in the clock payload, so this
/// probes the known variants instead of deserializing strictly.
pub fn parse_clock_snapshot(value: &Value) -> ClockSnapshot {
    let body = value.get("clock").unwrap_or(value);
    let routine = body
        .get("active_routine")
        .or_else(|| body.get("current_routine"))
        .filter(|v| v.is_object())
        .map(|v| ActiveRoutine {
            player: pick_u64(v, &["player", "player_id"]),
            player_name: pick_string(v, &["player_name", "name"]),
            apparatus: pick_string(v, &["apparatus", "current_apparatus"]),
        });
    ClockSnapshot {
        running: pick_bool(body, &["running", "is_running", "clock_running"]).unwrap_or(false),
        time_remaining: pick_u64(body, &["time_remaining", "seconds_remaining", "remaining"])
            .unwrap_or(0) as u32,
        current_rotation: pick_u64(body, &["current_rotation", "rotation", "current_period"])
            .unwrap_or(0) as u32,
        total_rotations: pick_u64(body, &["total_rotations", "rotations"]).unwrap_or(0) as u32,
        current_apparatus: pick_string(body, &["current_apparatus", "apparatus"]),
        in_timeout: pick_bool(body, &["in_timeout", "timeout_active"]).unwrap_or(false),
        active_routine: routine,
    }
}

/// Issues one clock command and returns the snapshot the server
/// answers with. `Status` is the only GET; everything else mutates.
pub fn clock_command(
    client: &ApiClient,
    match_id: u64,
    action: &ClockAction,
) -> Result<ClockSnapshot, ApiError> {
    let path = format!("matches/{match_id}/{}", action.path_segment());
    let value = match action {
        ClockAction::Status => client.get(&path)?,
        _ => client.send(Verb::Post, &path, action.body().as_ref())?,
    };
    Ok(parse_clock_snapshot(&value))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingRow {
    pub rank: u32,
    pub player: Option<u64>,
    pub player_name: String,
    pub team_name: Option<String>,
    pub apparatus: Option<String>,
    pub difficulty: f64,
    pub execution: f64,
    pub deductions: f64,
    pub total: f64,
}

pub fn parse_rankings(value: &Value) -> Vec<RankingRow> {
    result_rows(value)
        .iter()
        .enumerate()
        .map(|(index, row)| RankingRow {
            rank: pick_u64(row, &["rank", "position"]).unwrap_or(index as u64 + 1) as u32,
            player: pick_u64(row, &["player", "player_id"]),
            player_name: pick_string(row, &["player_name", "name", "player"]).unwrap_or_default(),
            team_name: pick_string(row, &["team_name", "team"]),
            apparatus: pick_string(row, &["apparatus"]),
            difficulty: pick_f64(row, &["difficulty_score", "difficulty"]).unwrap_or(0.0),
            execution: pick_f64(row, &["execution_score", "execution"]).unwrap_or(0.0),
            deductions: pick_f64(row, &["deductions", "total_deductions"]).unwrap_or(0.0),
            total: pick_f64(row, &["total_score", "total", "score"]).unwrap_or(0.0),
        })
        .collect()
}

pub fn rankings(
    client: &ApiClient,
    match_id: u64,
    apparatus: Option<&str>,
) -> Result<Vec<RankingRow>, ApiError> {
    let path = match apparatus {
        Some(ap) => format!("matches/{match_id}/rankings/?apparatus={ap}"),
        None => format!("matches/{match_id}/rankings/"),
    };
    let value = client.get(&path)?;
    Ok(parse_rankings(&value))
}

/// Recomputes all-around standings server-side and returns the fresh
/// ranking table.
pub fn calculate_all_around(client: &ApiClient, match_id: u64) -> Result<Vec<RankingRow>, ApiError> {
    let path = format!("matches/{match_id}/all-around/");
    let value = client.send(Verb::Post, &path, None)?;
    Ok(parse_rankings(&value))
}

/// A competition session (qualification, final, ...) as the backend
/// lists them for a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GymSession {
    pub id: Option<u64>,
    pub name: String,
    pub status: Option<String>,
    pub start_time: Option<String>,
}

pub fn parse_sessions(value: &Value) -> Vec<GymSession> {
    result_rows(value)
        .iter()
        .map(|row| GymSession {
            id: pick_u64(row, &["id", "session_id"]),
            name: pick_string(row, &["name", "session_name", "title"]).unwrap_or_default(),
            status: pick_string(row, &["status", "state"]),
            start_time: pick_string(row, &["start_time", "scheduled_start", "start_date"]),
        })
        .collect()
}

pub fn sessions(client: &ApiClient, match_id: u64) -> Result<Vec<GymSession>, ApiError> {
    let value = client.get(&format!("matches/{match_id}/sessions/"))?;
    Ok(parse_sessions(&value))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationInfo {
    pub number: u32,
    pub apparatus: Option<String>,
    pub status: Option<String>,
    pub duration_seconds: Option<u32>,
}

pub fn parse_rotations(value: &Value) -> Vec<RotationInfo> {
    result_rows(value)
        .iter()
        .enumerate()
        .map(|(index, row)| RotationInfo {
            number: pick_u64(row, &["number", "rotation", "rotation_number"])
                .unwrap_or(index as u64 + 1) as u32,
            apparatus: pick_string(row, &["apparatus", "current_apparatus"]),
            status: pick_string(row, &["status", "state"]),
            duration_seconds: pick_u64(row, &["duration_seconds", "duration"]).map(|d| d as u32),
        })
        .collect()
}

/// Lists the rotation schedule, as opposed to `AdvanceRotation` which
/// mutates the live one.
pub fn rotations(client: &ApiClient, match_id: u64) -> Result<Vec<RotationInfo>, ApiError> {
    let value = client.get(&format!("matches/{match_id}/rotations/"))?;
    Ok(parse_rotations(&value))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JudgePanel {
    pub apparatus: Option<String>,
    pub head_judge: Option<String>,
    pub judges: Vec<String>,
}

pub fn parse_judge_panels(value: &Value) -> Vec<JudgePanel> {
    result_rows(value)
        .iter()
        .map(|row| JudgePanel {
            apparatus: pick_string(row, &["apparatus"]),
            head_judge: pick_string(row, &["head_judge", "chief_judge"]),
            judges: row
                .get("judges")
                .or_else(|| row.get("panel"))
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::String(s) if !s.trim().is_empty() => {
                                Some(s.trim().to_string())
                            }
                            other => pick_string(other, &["name", "judge_name"]),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

pub fn judge_panels(client: &ApiClient, match_id: u64) -> Result<Vec<JudgePanel>, ApiError> {
    let value = client.get(&format!("matches/{match_id}/judge-panels/"))?;
    Ok(parse_judge_panels(&value))
}

pub fn finalize_results(client: &ApiClient, match_id: u64) -> Result<Value, ApiError> {
    let path = format!("matches/{match_id}/results/finalize/");
    client.send(Verb::Post, &path, None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Downloads the server-rendered results document as raw bytes.
pub fn export_results(
    client: &ApiClient,
    match_id: u64,
    format: ExportFormat,
) -> Result<Vec<u8>, ApiError> {
    let path = format!(
        "matches/{match_id}/results/export/?format={}",
        format.as_str()
    );
    client.get_bytes(&path)
}
