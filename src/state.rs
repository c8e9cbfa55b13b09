use std::collections::VecDeque;

use serde_json::Value;

use crate::countdown::CountdownMirror;
use crate::fields::{self, EntityKind};
use crate::form::FormModel;
use crate::gym_api::{ClockAction, ClockSnapshot, ExportFormat, RankingRow};
use crate::http_client::ApiError;
use crate::match_api::Match;
use crate::player_api::{Player, PlayerStats};
use crate::sport_api::Sport;
use crate::submit::SubmitOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Sports,
    Matches,
    MatchEdit { match_id: u64 },
    Players { match_id: u64 },
    GymClock { match_id: u64 },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Login
    }
}

/// What a finished submission was aimed at; the delta routes the
/// outcome back to the right form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTarget {
    Match { match_id: u64 },
    MatchTeam { match_team_id: u64, match_id: u64 },
    PlayerStats { player: u64 },
}

#[derive(Debug, Clone)]
pub enum Delta {
    LoggedIn {
        username: String,
        token: String,
    },
    LoginFailed(String),
    LoggedOut,
    SetSports(Result<Vec<Sport>, String>),
    SetMatches(Result<Vec<Match>, String>),
    SetMatchDetail(Result<Match, String>),
    Submitted {
        target: SubmitTarget,
        outcome: SubmitOutcome,
    },
    SetPlayers(Result<Vec<Player>, String>),
    SetPlayerStats(Result<PlayerStats, String>),
    SetClock {
        action: String,
        result: Result<ClockSnapshot, String>,
    },
    SetRankings(Result<Vec<RankingRow>, String>),
    ResultsFinalized(Result<(), String>),
    ExportSaved(Result<String, String>),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Login {
        username: String,
        password: String,
    },
    Logout,
    FetchSports,
    FetchMatches {
        sport: Option<u64>,
    },
    StartMatchSync {
        sport: Option<u64>,
    },
    StopMatchSync,
    FetchMatchDetail {
        match_id: u64,
    },
    StartDetailSync {
        match_id: u64,
    },
    StopDetailSync,
    SubmitMatch {
        match_id: u64,
        payload: Value,
    },
    SubmitMatchTeam {
        match_team_id: u64,
        match_id: u64,
        payload: Value,
    },
    FetchPlayers {
        team: Option<u64>,
    },
    FetchPlayerStats {
        match_id: u64,
        player: u64,
        team: Option<u64>,
    },
    SubmitPlayerStats {
        stats: PlayerStats,
        fields: serde_json::Map<String, Value>,
    },
    Clock {
        match_id: u64,
        action: ClockAction,
    },
    FetchRankings {
        match_id: u64,
        apparatus: Option<String>,
    },
    CalculateAllAround {
        match_id: u64,
    },
    FinalizeResults {
        match_id: u64,
    },
    ExportResults {
        match_id: u64,
        format: ExportFormat,
    },
    ExportRankingsLocal {
        match_id: u64,
        rows: Vec<RankingRow>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub screen: Screen,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,

    pub username: String,
    pub password: String,
    pub login_field: LoginField,
    pub login_in_progress: bool,
    pub logged_in_as: Option<String>,

    pub sports: Vec<Sport>,
    pub sports_loading: bool,
    pub sport_selected: usize,
    pub current_sport: Option<Sport>,

    pub matches: Vec<Match>,
    pub matches_loading: bool,
    pub match_selected: usize,

    pub current_match: Option<Match>,
    pub detail_loading: bool,
    pub form: FormModel,
    pub form_selected: usize,
    pub edit_buffer: Option<String>,
    pub submit_in_progress: bool,

    pub players: Vec<Player>,
    pub players_loading: bool,
    pub player_selected: usize,
    pub player_stats: Option<PlayerStats>,
    pub player_form: FormModel,

    pub clock: ClockSnapshot,
    pub clock_loading: bool,
    pub countdown: CountdownMirror,
    pub rotation_prompt: bool,
    pub rankings: Vec<RankingRow>,
    pub rankings_loading: bool,
    pub rankings_apparatus: Option<String>,

    /// Commands queued by `apply_delta` for the main loop to forward
    /// to the provider (chained fetches after login, refreshes after
    /// a successful submit).
    pub pending: VecDeque<ProviderCommand>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            logs: VecDeque::with_capacity(200),
            matches: Vec::with_capacity(32),
            ..Self::default()
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_sport(&self) -> Option<&Sport> {
        self.sports.get(self.sport_selected)
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.matches.get(self.match_selected)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.players.get(self.player_selected)
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Sports => cycle_next(&mut self.sport_selected, self.sports.len()),
            Screen::Matches => cycle_next(&mut self.match_selected, self.matches.len()),
            Screen::Players { .. } => {
                if self.player_stats.is_some() {
                    cycle_next(&mut self.form_selected, self.player_form.len());
                } else {
                    cycle_next(&mut self.player_selected, self.players.len());
                }
            }
            Screen::MatchEdit { .. } => cycle_next(&mut self.form_selected, self.form.len()),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Sports => cycle_prev(&mut self.sport_selected, self.sports.len()),
            Screen::Matches => cycle_prev(&mut self.match_selected, self.matches.len()),
            Screen::Players { .. } => {
                if self.player_stats.is_some() {
                    cycle_prev(&mut self.form_selected, self.player_form.len());
                } else {
                    cycle_prev(&mut self.player_selected, self.players.len());
                }
            }
            Screen::MatchEdit { .. } => cycle_prev(&mut self.form_selected, self.form.len()),
            _ => {}
        }
    }

    /// Rebuilds the match form from the catalog and the match's
    /// current values. The server is authoritative; any in-progress
    /// edit is dropped by the caller's choice, not here.
    pub fn rebuild_match_form(&mut self) {
        let (Some(sport), Some(m)) = (&self.current_sport, &self.current_match) else {
            self.form = FormModel::default();
            return;
        };
        let descriptors = fields::fields_for(EntityKind::Match, &sport.config());
        self.form = FormModel::build(descriptors, &m.form_values());
        if self.form_selected >= self.form.len() {
            self.form_selected = 0;
        }
        self.edit_buffer = None;
    }

    pub fn rebuild_player_form(&mut self) {
        let (Some(sport), Some(stats)) = (&self.current_sport, &self.player_stats) else {
            self.player_form = FormModel::default();
            return;
        };
        let descriptors = fields::fields_for(EntityKind::Player, &sport.config());
        self.player_form = FormModel::build(descriptors, &stats.form_values());
        if self.form_selected >= self.player_form.len() {
            self.form_selected = 0;
        }
        self.edit_buffer = None;
    }

    /// Called by the UI loop once per elapsed wall-clock second. The
    /// mirror reaching zero raises the rotation prompt; whether the
    /// rotation actually advances is the server's decision.
    pub fn on_second_tick(&mut self) {
        if self.countdown.tick() {
            self.rotation_prompt = true;
        }
    }
}

fn cycle_next(selected: &mut usize, total: usize) {
    if total == 0 {
        *selected = 0;
        return;
    }
    *selected = (*selected + 1) % total;
}

fn cycle_prev(selected: &mut usize, total: usize) {
    if total == 0 {
        *selected = 0;
        return;
    }
    if *selected == 0 {
        *selected = total - 1;
    } else {
        *selected -= 1;
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::LoggedIn { username, token: _ } => {
            state.login_in_progress = false;
            state.logged_in_as = Some(username.clone());
            state.password.clear();
            state.screen = Screen::Sports;
            state.sports_loading = true;
            state.pending.push_back(ProviderCommand::FetchSports);
            state.push_log(format!("[INFO] Logged in as {username}"));
        }
        Delta::LoginFailed(err) => {
            state.login_in_progress = false;
            state.push_log(format!("[WARN] Login failed: {err}"));
        }
        Delta::LoggedOut => {
            let logs = std::mem::take(&mut state.logs);
            *state = AppState::new();
            state.logs = logs;
            state.push_log("[INFO] Logged out");
        }
        Delta::SetSports(result) => {
            state.sports_loading = false;
            match result {
                Ok(sports) => {
                    state.sports = sports;
                    if state.sport_selected >= state.sports.len() {
                        state.sport_selected = 0;
                    }
                }
                Err(err) => state.push_log(format!("[WARN] Sports fetch error: {err}")),
            }
        }
        Delta::SetMatches(result) => {
            state.matches_loading = false;
            match result {
                Ok(matches) => {
                    state.matches = matches;
                    if state.match_selected >= state.matches.len() {
                        state.match_selected = 0;
                    }
                }
                Err(err) => state.push_log(format!("[WARN] Match list error: {err}")),
            }
        }
        Delta::SetMatchDetail(result) => {
            state.detail_loading = false;
            match result {
                Ok(m) => {
                    let editing = state.edit_buffer.is_some();
                    state.current_match = Some(m);
                    // A sync refresh must not yank the form out from
                    // under an open edit.
                    if !editing && matches!(state.screen, Screen::MatchEdit { .. }) {
                        state.rebuild_match_form();
                    }
                }
                Err(err) => state.push_log(format!("[WARN] Match detail error: {err}")),
            }
        }
        Delta::Submitted { target, outcome } => {
            state.submit_in_progress = false;
            match outcome {
                SubmitOutcome::Success { attempts, .. } => match target {
                    SubmitTarget::Match { match_id }
                    | SubmitTarget::MatchTeam { match_id, .. } => {
                        state.push_log(format!("[INFO] Saved ({attempts} attempt(s))"));
                        state
                            .pending
                            .push_back(ProviderCommand::FetchMatchDetail { match_id });
                    }
                    SubmitTarget::PlayerStats { player } => {
                        state.push_log(format!(
                            "[INFO] Player stats saved ({attempts} attempt(s))"
                        ));
                        if let Screen::Players { match_id } = state.screen {
                            let team = state.player_stats.as_ref().and_then(|s| s.team);
                            state.pending.push_back(ProviderCommand::FetchPlayerStats {
                                match_id,
                                player,
                                team,
                            });
                        }
                    }
                },
                SubmitOutcome::Failed { error, attempts } => {
                    if let ApiError::Validation { fields } = &error {
                        match target {
                            SubmitTarget::PlayerStats { .. } => {
                                state.player_form.apply_server_errors(fields)
                            }
                            _ => state.form.apply_server_errors(fields),
                        }
                    }
                    state.push_log(format!(
                        "[WARN] Submit failed after {attempts} attempt(s): {}",
                        error.detail()
                    ));
                }
            }
        }
        Delta::SetPlayers(result) => {
            state.players_loading = false;
            match result {
                Ok(players) => {
                    state.players = players;
                    if state.player_selected >= state.players.len() {
                        state.player_selected = 0;
                    }
                }
                Err(err) => state.push_log(format!("[WARN] Player list error: {err}")),
            }
        }
        Delta::SetPlayerStats(result) => {
            state.players_loading = false;
            match result {
                Ok(stats) => {
                    state.player_stats = Some(stats);
                    state.rebuild_player_form();
                }
                Err(err) => state.push_log(format!("[WARN] Player stats error: {err}")),
            }
        }
        Delta::SetClock { action, result } => {
            state.clock_loading = false;
            match result {
                Ok(snapshot) => {
                    // Every authoritative snapshot re-seeds the local
                    // mirror; it never free-runs past the server.
                    state.countdown.seed(snapshot.time_remaining);
                    if !snapshot.running {
                        state.countdown.stop();
                    }
                    if action == "advance rotation" {
                        state.rotation_prompt = false;
                    }
                    state.clock = snapshot;
                }
                Err(err) => state.push_log(format!("[WARN] Clock {action} error: {err}")),
            }
        }
        Delta::SetRankings(result) => {
            state.rankings_loading = false;
            match result {
                Ok(rows) => state.rankings = rows,
                Err(err) => state.push_log(format!("[WARN] Rankings error: {err}")),
            }
        }
        Delta::ResultsFinalized(result) => match result {
            Ok(()) => state.push_log("[INFO] Results finalized"),
            Err(err) => state.push_log(format!("[WARN] Finalize error: {err}")),
        },
        Delta::ExportSaved(result) => match result {
            Ok(path) => state.push_log(format!("[INFO] Export saved: {path}")),
            Err(err) => state.push_log(format!("[WARN] Export error: {err}")),
        },
        Delta::Log(msg) => state.push_log(msg),
    }
}
