use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::config::Settings;
use crate::export;
use crate::gym_api;
use crate::http_client::ApiClient;
use crate::match_api;
use crate::player_api;
use crate::session;
use crate::sport_api;
use crate::state::{Delta, ProviderCommand, SubmitTarget};
use crate::sync::{self, SyncHandle};

/// Runs backend commands off the UI thread. One provider per app;
/// the long-poll loops it starts are owned here so a stop command or
/// provider shutdown tears them down.
pub fn spawn_provider(
    client: Arc<ApiClient>,
    settings: Settings,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        let mut match_sync: Option<SyncHandle> = None;
        let mut detail_sync: Option<SyncHandle> = None;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Login { username, password } => {
                    match client.login(&username, &password) {
                        Ok(token) => {
                            session::save(&token, &username);
                            let _ = tx.send(Delta::LoggedIn { username, token });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::LoginFailed(err.detail()));
                        }
                    }
                }
                ProviderCommand::Logout => {
                    match_sync = None;
                    detail_sync = None;
                    client.clear_token();
                    session::clear();
                    let _ = tx.send(Delta::LoggedOut);
                }
                ProviderCommand::FetchSports => {
                    let result = sport_api::list_sports(&client).map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetSports(result));
                }
                ProviderCommand::FetchMatches { sport } => {
                    let result = match_api::list_matches(&client, sport).map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetMatches(result));
                }
                ProviderCommand::StartMatchSync { sport } => {
                    let interval = settings.list_poll;
                    let fetch_client = client.clone();
                    let update_tx = tx.clone();
                    match_sync = Some(sync::start(
                        interval,
                        move || match_api::list_matches(&fetch_client, sport),
                        move |result| {
                            let _ =
                                update_tx.send(Delta::SetMatches(result.map_err(|e| e.detail())));
                        },
                    ));
                }
                ProviderCommand::StopMatchSync => {
                    match_sync = None;
                }
                ProviderCommand::FetchMatchDetail { match_id } => {
                    let result = match_api::get_match(&client, match_id).map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetMatchDetail(result));
                }
                ProviderCommand::StartDetailSync { match_id } => {
                    let interval = settings.detail_poll;
                    let fetch_client = client.clone();
                    let update_tx = tx.clone();
                    detail_sync = Some(sync::start(
                        interval,
                        move || match_api::get_match(&fetch_client, match_id),
                        move |result| {
                            let _ = update_tx
                                .send(Delta::SetMatchDetail(result.map_err(|e| e.detail())));
                        },
                    ));
                }
                ProviderCommand::StopDetailSync => {
                    detail_sync = None;
                }
                ProviderCommand::SubmitMatch { match_id, payload } => {
                    let outcome = match_api::patch_match(&client, match_id, &payload);
                    let _ = tx.send(Delta::Submitted {
                        target: SubmitTarget::Match { match_id },
                        outcome,
                    });
                }
                ProviderCommand::SubmitMatchTeam {
                    match_team_id,
                    match_id,
                    payload,
                } => {
                    let outcome = match_api::patch_match_team(&client, match_team_id, &payload);
                    let _ = tx.send(Delta::Submitted {
                        target: SubmitTarget::MatchTeam {
                            match_team_id,
                            match_id,
                        },
                        outcome,
                    });
                }
                ProviderCommand::FetchPlayers { team } => {
                    let result = player_api::list_players(&client, team).map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetPlayers(result));
                }
                ProviderCommand::FetchPlayerStats {
                    match_id,
                    player,
                    team,
                } => {
                    let result = player_api::get_or_create_stats(&client, match_id, player, team)
                        .map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetPlayerStats(result));
                }
                ProviderCommand::SubmitPlayerStats { stats, fields } => {
                    let player = stats.player;
                    let outcome = player_api::submit_stats(&client, &stats, fields);
                    let _ = tx.send(Delta::Submitted {
                        target: SubmitTarget::PlayerStats { player },
                        outcome,
                    });
                }
                ProviderCommand::Clock { match_id, action } => {
                    let result = gym_api::clock_command(&client, match_id, &action)
                        .map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetClock {
                        action: action.label().to_string(),
                        result,
                    });
                }
                ProviderCommand::FetchRankings {
                    match_id,
                    apparatus,
                } => {
                    let result = gym_api::rankings(&client, match_id, apparatus.as_deref())
                        .map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetRankings(result));
                }
                ProviderCommand::CalculateAllAround { match_id } => {
                    let result =
                        gym_api::calculate_all_around(&client, match_id).map_err(|e| e.detail());
                    let _ = tx.send(Delta::SetRankings(result));
                }
                ProviderCommand::FinalizeResults { match_id } => {
                    let result = gym_api::finalize_results(&client, match_id)
                        .map(|_| ())
                        .map_err(|e| e.detail());
                    let _ = tx.send(Delta::ResultsFinalized(result));
                }
                ProviderCommand::ExportResults { match_id, format } => {
                    let result = gym_api::export_results(&client, match_id, format)
                        .map_err(|e| e.detail())
                        .and_then(|bytes| {
                            export::save_export_blob(&settings.export_dir, match_id, format, &bytes)
                                .map(|path| path.display().to_string())
                                .map_err(|e| e.to_string())
                        });
                    let _ = tx.send(Delta::ExportSaved(result));
                }
                ProviderCommand::ExportRankingsLocal { match_id, rows } => {
                    let result =
                        export::export_rankings_xlsx(&settings.export_dir, match_id, &rows)
                            .map(|path| path.display().to_string())
                            .map_err(|e| e.to_string());
                    let _ = tx.send(Delta::ExportSaved(result));
                }
                ProviderCommand::Shutdown => break,
            }
        }
    });
}
