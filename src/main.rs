use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use ngsc_terminal::config::{self, Settings};
use ngsc_terminal::feed;
use ngsc_terminal::fields::InputKind;
use ngsc_terminal::form::FormModel;
use ngsc_terminal::gym_api::{ClockAction, ExportFormat};
use ngsc_terminal::http_client::ApiClient;
use ngsc_terminal::session;
use ngsc_terminal::state::{
    AppState, Delta, LoginField, ProviderCommand, Screen, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    last_second: Instant,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            last_second: Instant::now(),
        }
    }

    fn send(&self, cmd: ProviderCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Forwards commands that `apply_delta` queued (post-login
    /// fetches, refresh-after-submit).
    fn drain_pending(&mut self) {
        while let Some(cmd) = self.state.pending.pop_front() {
            let _ = self.cmd_tx.send(cmd);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.edit_buffer.is_some() {
            self.on_edit_key(key);
            return;
        }
        if matches!(self.state.screen, Screen::Login) {
            self.on_login_key(key);
            return;
        }
        if self.state.rotation_prompt {
            self.on_rotation_prompt_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Esc | KeyCode::Char('b') => self.go_back(),
            _ => match self.state.screen.clone() {
                Screen::Sports => self.on_sports_key(key),
                Screen::Matches => self.on_matches_key(key),
                Screen::MatchEdit { match_id } => self.on_match_edit_key(key, match_id),
                Screen::Players { match_id } => self.on_players_key(key, match_id),
                Screen::GymClock { match_id } => self.on_gym_key(key, match_id),
                Screen::Login => {}
            },
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.state.login_field = match self.state.login_field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Backspace => {
                match self.state.login_field {
                    LoginField::Username => self.state.username.pop(),
                    LoginField::Password => self.state.password.pop(),
                };
            }
            KeyCode::Char(c) => match self.state.login_field {
                LoginField::Username => self.state.username.push(c),
                LoginField::Password => self.state.password.push(c),
            },
            KeyCode::Enter => {
                if self.state.login_in_progress {
                    return;
                }
                let username = self.state.username.trim().to_string();
                if username.is_empty() || self.state.password.is_empty() {
                    self.state.push_log("[WARN] Username and password required");
                    return;
                }
                self.state.login_in_progress = true;
                self.send(ProviderCommand::Login {
                    username,
                    password: self.state.password.clone(),
                });
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                if let Some(buffer) = self.state.edit_buffer.as_mut() {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.state.edit_buffer.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Enter => {
                let Some(buffer) = self.state.edit_buffer.take() else {
                    return;
                };
                let index = self.state.form_selected;
                // A parse failure leaves the stored value untouched
                // with the error marked on the control.
                let _ = self.active_form_mut().set_input(index, &buffer);
            }
            KeyCode::Esc => {
                self.state.edit_buffer = None;
            }
            _ => {}
        }
    }

    fn on_rotation_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Screen::GymClock { match_id } = self.state.screen {
                    self.state.clock_loading = true;
                    self.send(ProviderCommand::Clock {
                        match_id,
                        action: ClockAction::AdvanceRotation,
                    });
                }
                self.state.rotation_prompt = false;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                // Declined: the mirror stays at zero until the next
                // authoritative snapshot.
                self.state.rotation_prompt = false;
            }
            _ => {}
        }
    }

    fn on_sports_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let Some(sport) = self.state.selected_sport().cloned() else {
                    return;
                };
                let sport_id = sport.id;
                self.state.current_sport = Some(sport);
                self.state.screen = Screen::Matches;
                self.state.matches_loading = true;
                self.send(ProviderCommand::FetchMatches {
                    sport: Some(sport_id),
                });
                self.send(ProviderCommand::StartMatchSync {
                    sport: Some(sport_id),
                });
            }
            KeyCode::Char('r') => {
                self.state.sports_loading = true;
                self.send(ProviderCommand::FetchSports);
            }
            KeyCode::Char('L') => {
                self.send(ProviderCommand::Logout);
            }
            _ => {}
        }
    }

    fn on_matches_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let Some(m) = self.state.selected_match().cloned() else {
                    return;
                };
                self.send(ProviderCommand::StopMatchSync);
                self.state.screen = Screen::MatchEdit { match_id: m.id };
                self.state.detail_loading = true;
                self.send(ProviderCommand::FetchMatchDetail { match_id: m.id });
                if m.is_live() {
                    self.send(ProviderCommand::StartDetailSync { match_id: m.id });
                }
                self.state.current_match = Some(m);
                self.state.rebuild_match_form();
            }
            KeyCode::Char('r') => {
                let sport = self.state.current_sport.as_ref().map(|s| s.id);
                self.state.matches_loading = true;
                self.send(ProviderCommand::FetchMatches { sport });
            }
            _ => {}
        }
    }

    fn on_match_edit_key(&mut self, key: KeyEvent, match_id: u64) {
        match key.code {
            KeyCode::Enter => self.begin_or_toggle_edit(),
            KeyCode::Char(' ') => {
                let index = self.state.form_selected;
                self.active_form_mut().toggle(index);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let index = self.state.form_selected;
                self.active_form_mut().cycle_option(index, false);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let index = self.state.form_selected;
                self.active_form_mut().cycle_option(index, true);
            }
            KeyCode::Char('s') => self.submit_match_form(match_id),
            KeyCode::Char('r') => {
                self.state.detail_loading = true;
                self.send(ProviderCommand::FetchMatchDetail { match_id });
            }
            KeyCode::Char('p') => {
                let team = self
                    .state
                    .current_match
                    .as_ref()
                    .and_then(|m| m.match_teams.first())
                    .map(|mt| mt.team);
                self.state.screen = Screen::Players { match_id };
                self.state.player_stats = None;
                self.state.players_loading = true;
                self.state.form_selected = 0;
                self.send(ProviderCommand::FetchPlayers { team });
            }
            KeyCode::Char('g') => {
                self.state.screen = Screen::GymClock { match_id };
                self.state.clock_loading = true;
                self.state.rankings_loading = true;
                self.send(ProviderCommand::Clock {
                    match_id,
                    action: ClockAction::Status,
                });
                self.send(ProviderCommand::FetchRankings {
                    match_id,
                    apparatus: None,
                });
            }
            _ => {}
        }
    }

    fn on_players_key(&mut self, key: KeyEvent, match_id: u64) {
        if self.state.player_stats.is_some() {
            match key.code {
                KeyCode::Enter => self.begin_or_toggle_edit(),
                KeyCode::Char(' ') => {
                    let index = self.state.form_selected;
                    self.active_form_mut().toggle(index);
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    let index = self.state.form_selected;
                    self.active_form_mut().cycle_option(index, false);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    let index = self.state.form_selected;
                    self.active_form_mut().cycle_option(index, true);
                }
                KeyCode::Char('s') => self.submit_player_form(),
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Enter {
            let Some(player) = self.state.selected_player() else {
                return;
            };
            let player_id = player.id;
            let team = player.team;
            self.state.players_loading = true;
            self.state.form_selected = 0;
            self.send(ProviderCommand::FetchPlayerStats {
                match_id,
                player: player_id,
                team,
            });
        }
    }

    fn on_gym_key(&mut self, key: KeyEvent, match_id: u64) {
        let clock = |action: ClockAction| ProviderCommand::Clock { match_id, action };
        let cmd = match key.code {
            KeyCode::Char('i') => Some(clock(ClockAction::Initialize)),
            KeyCode::Char('s') => Some(clock(ClockAction::Start)),
            KeyCode::Char('p') => Some(clock(ClockAction::Pause)),
            KeyCode::Char('r') => Some(clock(ClockAction::Resume)),
            KeyCode::Char('x') => Some(clock(ClockAction::Reset)),
            KeyCode::Char('t') => Some(clock(ClockAction::Status)),
            KeyCode::Char('o') => {
                let player = self.state.selected_player().map(|p| p.id);
                let apparatus = self.state.clock.current_apparatus.clone();
                match (player, apparatus) {
                    (Some(player), Some(apparatus)) => {
                        Some(clock(ClockAction::StartRoutine { player, apparatus }))
                    }
                    _ => {
                        self.state
                            .push_log("[WARN] Routine needs a player and a current apparatus");
                        None
                    }
                }
            }
            KeyCode::Char('e') => Some(clock(ClockAction::StopRoutine)),
            KeyCode::Char('c') => {
                let team = self
                    .state
                    .current_match
                    .as_ref()
                    .and_then(|m| m.match_teams.first())
                    .map(|mt| mt.team);
                match team {
                    Some(team) => Some(clock(ClockAction::CallTimeout {
                        team,
                        duration_seconds: 60,
                    })),
                    None => {
                        self.state.push_log("[WARN] No team to call a timeout for");
                        None
                    }
                }
            }
            KeyCode::Char('n') => Some(clock(ClockAction::EndTimeout)),
            KeyCode::Char('a') => Some(clock(ClockAction::AdvanceRotation)),
            KeyCode::Char('R') => {
                self.state.rankings_loading = true;
                Some(ProviderCommand::FetchRankings {
                    match_id,
                    apparatus: self.state.rankings_apparatus.clone(),
                })
            }
            KeyCode::Char('A') => {
                self.state.rankings_loading = true;
                Some(ProviderCommand::CalculateAllAround { match_id })
            }
            KeyCode::Char('F') => Some(ProviderCommand::FinalizeResults { match_id }),
            KeyCode::Char('1') => Some(ProviderCommand::ExportResults {
                match_id,
                format: ExportFormat::Pdf,
            }),
            KeyCode::Char('2') => Some(ProviderCommand::ExportResults {
                match_id,
                format: ExportFormat::Excel,
            }),
            KeyCode::Char('3') => Some(ProviderCommand::ExportResults {
                match_id,
                format: ExportFormat::Csv,
            }),
            KeyCode::Char('X') => Some(ProviderCommand::ExportRankingsLocal {
                match_id,
                rows: self.state.rankings.clone(),
            }),
            _ => None,
        };
        if let Some(cmd) = cmd {
            if matches!(cmd, ProviderCommand::Clock { .. }) {
                self.state.clock_loading = true;
            }
            self.send(cmd);
        }
    }

    fn begin_or_toggle_edit(&mut self) {
        let index = self.state.form_selected;
        let Some(control) = self.active_form().controls.get(index) else {
            return;
        };
        match control.field.input {
            InputKind::Checkbox => self.active_form_mut().toggle(index),
            InputKind::Select => self.active_form_mut().cycle_option(index, true),
            _ => {
                self.state.edit_buffer = Some(control.value.display());
            }
        }
    }

    fn active_form(&self) -> &FormModel {
        match self.state.screen {
            Screen::Players { .. } if self.state.player_stats.is_some() => &self.state.player_form,
            _ => &self.state.form,
        }
    }

    fn active_form_mut(&mut self) -> &mut FormModel {
        match self.state.screen {
            Screen::Players { .. } if self.state.player_stats.is_some() => {
                &mut self.state.player_form
            }
            _ => &mut self.state.form,
        }
    }

    fn submit_match_form(&mut self, match_id: u64) {
        if self.state.submit_in_progress {
            return;
        }
        if !self.state.form.validate() {
            self.state.push_log("[WARN] Form has validation errors");
            return;
        }
        let payload = serde_json::Value::Object(self.state.form.serialize());
        self.state.submit_in_progress = true;
        self.send(ProviderCommand::SubmitMatch { match_id, payload });
    }

    fn submit_player_form(&mut self) {
        if self.state.submit_in_progress {
            return;
        }
        if !self.state.player_form.validate() {
            self.state.push_log("[WARN] Form has validation errors");
            return;
        }
        let Some(stats) = self.state.player_stats.clone() else {
            return;
        };
        let fields = self.state.player_form.serialize();
        self.state.submit_in_progress = true;
        self.send(ProviderCommand::SubmitPlayerStats { stats, fields });
    }

    fn go_back(&mut self) {
        match self.state.screen.clone() {
            Screen::Login | Screen::Sports => {}
            Screen::Matches => {
                self.send(ProviderCommand::StopMatchSync);
                self.state.screen = Screen::Sports;
                self.state.matches.clear();
                self.state.match_selected = 0;
            }
            Screen::MatchEdit { .. } => {
                self.send(ProviderCommand::StopDetailSync);
                let sport = self.state.current_sport.as_ref().map(|s| s.id);
                self.state.screen = Screen::Matches;
                self.state.current_match = None;
                self.state.form = FormModel::default();
                self.state.form_selected = 0;
                self.state.matches_loading = true;
                self.send(ProviderCommand::FetchMatches { sport });
                self.send(ProviderCommand::StartMatchSync { sport });
            }
            Screen::Players { match_id } => {
                if self.state.player_stats.is_some() {
                    self.state.player_stats = None;
                    self.state.player_form = FormModel::default();
                    self.state.form_selected = 0;
                } else {
                    self.state.screen = Screen::MatchEdit { match_id };
                    self.state.form_selected = 0;
                    self.state.rebuild_match_form();
                }
            }
            Screen::GymClock { match_id } => {
                self.state.countdown.stop();
                self.state.rotation_prompt = false;
                self.state.screen = Screen::MatchEdit { match_id };
                self.state.form_selected = 0;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    let settings = Settings::from_env();
    let client = Arc::new(ApiClient::new(&settings.api_base)?);

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(client.clone(), settings, tx, cmd_rx);

    let mut app = App::new(cmd_tx);

    // A stored session skips the login screen; the first request
    // bounces back to it if the token has gone stale.
    if let Some(saved) = session::load() {
        client.set_token(&saved.token);
        app.state.logged_in_as = Some(saved.username.clone());
        app.state.screen = Screen::Sports;
        app.state.sports_loading = true;
        app.send(ProviderCommand::FetchSports);
        app.state
            .push_log(format!("[INFO] Restored session for {}", saved.username));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    app.send(ProviderCommand::Shutdown);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.drain_pending();

        if app.last_second.elapsed() >= Duration::from_secs(1) {
            app.state.on_second_tick();
            app.last_second = Instant::now();
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                    app.drain_pending();
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen.clone() {
        Screen::Login => render_login(frame, chunks[1], &app.state),
        Screen::Sports => render_sports(frame, chunks[1], &app.state),
        Screen::Matches => render_matches(frame, chunks[1], &app.state),
        Screen::MatchEdit { .. } => render_form(frame, chunks[1], &app.state, &app.state.form),
        Screen::Players { .. } => render_players(frame, chunks[1], app),
        Screen::GymClock { .. } => render_gym_clock(frame, chunks[1], &app.state),
    }

    render_console(frame, chunks[2], &app.state);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }

    if app.state.rotation_prompt {
        render_rotation_prompt(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match &state.screen {
        Screen::Login => "LOGIN".to_string(),
        Screen::Sports => "SPORTS".to_string(),
        Screen::Matches => match &state.current_sport {
            Some(sport) => format!("MATCHES | {}", sport.name),
            None => "MATCHES".to_string(),
        },
        Screen::MatchEdit { match_id } => format!("MATCH {match_id}"),
        Screen::Players { match_id } => format!("PLAYERS | match {match_id}"),
        Screen::GymClock { match_id } => format!("CLOCK | match {match_id}"),
    };
    let user = state.logged_in_as.as_deref().unwrap_or("-");
    format!("NGSC ADMIN | {screen} | {user}")
}

fn footer_text(state: &AppState) -> String {
    match &state.screen {
        Screen::Login => "Tab Switch field | Enter Login | Esc Quit".to_string(),
        Screen::Sports => {
            "j/k Move | Enter Matches | r Refresh | L Logout | ? Help | q Quit".to_string()
        }
        Screen::Matches => {
            "j/k Move | Enter Edit | r Refresh | b/Esc Back | ? Help | q Quit".to_string()
        }
        Screen::MatchEdit { .. } => {
            "j/k Move | Enter Edit | Space Toggle | h/l Cycle | s Save | p Players | g Clock | b/Esc Back"
                .to_string()
        }
        Screen::Players { .. } => {
            if state.player_stats.is_some() {
                "j/k Move | Enter Edit | s Save | Esc Back to list".to_string()
            } else {
                "j/k Move | Enter Stats | Esc Back".to_string()
            }
        }
        Screen::GymClock { .. } => {
            "i Init | s Start | p Pause | r Resume | x Reset | a Rotation | o/e Routine | c/n Timeout | R/A Rankings | F Finalize | 1/2/3 Export | Esc Back"
                .to_string()
        }
    }
}

fn render_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(50, 40, area);
    let masked: String = "*".repeat(state.password.len());
    let user_marker = if state.login_field == LoginField::Username {
        ">"
    } else {
        " "
    };
    let pass_marker = if state.login_field == LoginField::Password {
        ">"
    } else {
        " "
    };
    let status = if state.login_in_progress {
        "Signing in..."
    } else {
        ""
    };
    let text = format!(
        "\n{user_marker} Username: {}\n{pass_marker} Password: {}\n\n{status}",
        state.username, masked
    );
    let block = Paragraph::new(text).block(Block::default().title("Sign in").borders(Borders::ALL));
    frame.render_widget(block, popup);
}

fn render_sports(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    if state.sports_loading {
        lines.push(Line::from("loading..."));
    }
    for (idx, sport) in state.sports.iter().enumerate() {
        let marker = if idx == state.sport_selected { ">" } else { " " };
        let team = if sport.is_team_sport { "team" } else { "individual" };
        let style = if idx == state.sport_selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!("{marker} {:>4}  {:<24} {team}", sport.id, sport.name),
            style,
        ));
    }
    if state.sports.is_empty() && !state.sports_loading {
        lines.push(Line::from("no sports"));
    }
    let block = Paragraph::new(lines)
        .block(Block::default().title("Sports").borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_matches(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    if state.matches_loading {
        lines.push(Line::from("loading..."));
    }
    for (idx, m) in state.matches.iter().enumerate() {
        let marker = if idx == state.match_selected { ">" } else { " " };
        let style = if m.is_live() {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let style = if idx == state.match_selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };
        lines.push(Line::styled(
            format!(
                "{marker} {:>5}  {:<36} {:>7}  {:<9}",
                m.id,
                m.title(),
                m.score_line(),
                m.status.as_str()
            ),
            style,
        ));
    }
    if state.matches.is_empty() && !state.matches_loading {
        lines.push(Line::from("no matches"));
    }
    let block = Paragraph::new(lines)
        .block(Block::default().title("Matches").borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState, form: &FormModel) {
    let mut lines = Vec::new();
    if state.detail_loading {
        lines.push(Line::from("refreshing..."));
    }
    for (idx, control) in form.controls.iter().enumerate() {
        let marker = if idx == state.form_selected { ">" } else { " " };
        let value = if idx == state.form_selected {
            match &state.edit_buffer {
                Some(buffer) => format!("{buffer}_"),
                None => control.value.display(),
            }
        } else {
            control.value.display()
        };
        let mut text = format!("{marker} {:<26} {value}", control.field.label);
        if !control.errors.is_empty() {
            text.push_str(&format!("   ! {}", control.errors.join(", ")));
        }
        let style = if !control.errors.is_empty() {
            Style::default().fg(Color::Red)
        } else if idx == state.form_selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(text, style));
    }
    let title = if state.submit_in_progress {
        "Edit (saving...)"
    } else {
        "Edit"
    };
    let block = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_players(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    if state.player_stats.is_some() {
        render_form(frame, area, state, &state.player_form);
        return;
    }
    let mut lines = Vec::new();
    if state.players_loading {
        lines.push(Line::from("loading..."));
    }
    for (idx, player) in state.players.iter().enumerate() {
        let marker = if idx == state.player_selected { ">" } else { " " };
        let number = player
            .jersey_number
            .map(|n| format!("#{n}"))
            .unwrap_or_default();
        let style = if idx == state.player_selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!(
                "{marker} {:>5}  {:<28} {:>4} {}",
                player.id,
                player.display_name(),
                number,
                player.position.as_deref().unwrap_or("")
            ),
            style,
        ));
    }
    if state.players.is_empty() && !state.players_loading {
        lines.push(Line::from("no players"));
    }
    let block = Paragraph::new(lines)
        .block(Block::default().title("Players").borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_gym_clock(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(1)])
        .split(area);

    let clock = &state.clock;
    let running = if state.countdown.is_running() {
        "RUNNING"
    } else {
        "STOPPED"
    };
    let mut text = format!(
        "\n   {}   {running}\n\n   Rotation {}/{}   Apparatus: {}",
        state.countdown.display(),
        clock.current_rotation,
        clock.total_rotations,
        clock.current_apparatus.as_deref().unwrap_or("-"),
    );
    if clock.in_timeout {
        text.push_str("   [TIMEOUT]");
    }
    if let Some(routine) = &clock.active_routine {
        text.push_str(&format!(
            "\n   Routine: {} on {}",
            routine.player_name.as_deref().unwrap_or("?"),
            routine.apparatus.as_deref().unwrap_or("?"),
        ));
    }
    let title = if state.clock_loading {
        "Clock (waiting for server...)"
    } else {
        "Clock"
    };
    let block = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(block, chunks[0]);

    let mut lines = Vec::new();
    if state.rankings_loading {
        lines.push(Line::from("loading..."));
    }
    lines.push(Line::styled(
        format!(
            "  {:<4} {:<24} {:<16} {:>6} {:>6} {:>6} {:>7}",
            "Rank", "Player", "Team", "D", "E", "Ded", "Total"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    for row in &state.rankings {
        lines.push(Line::from(format!(
            "  {:<4} {:<24} {:<16} {:>6.2} {:>6.2} {:>6.2} {:>7.3}",
            row.rank,
            row.player_name,
            row.team_name.as_deref().unwrap_or("-"),
            row.difficulty,
            row.execution,
            row.deductions,
            row.total
        )));
    }
    let block = Paragraph::new(lines)
        .block(Block::default().title("Rankings").borders(Borders::ALL));
    frame.render_widget(block, chunks[1]);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible.max(1))
        .rev()
        .map(|msg| Line::from(msg.clone()))
        .collect();
    let block = Paragraph::new(lines)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_rotation_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 20, area);
    frame.render_widget(Clear, popup);
    let text = "\nRotation time expired.\n\nAdvance to the next rotation?\n\n  y Advance    n Hold";
    let block = Paragraph::new(text)
        .block(Block::default().title("Rotation").borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(block, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "NGSC Admin - Help",
        "",
        "Global:",
        "  j/k or ↑/↓   Move",
        "  b / Esc      Back",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Forms:",
        "  Enter        Edit field / commit",
        "  Space        Toggle checkbox",
        "  h/l          Cycle select options",
        "  s            Save",
        "",
        "Clock:",
        "  i/s/p/r/x    Init/start/pause/resume/reset",
        "  a            Advance rotation",
        "  o/e          Start/stop routine",
        "  c/n          Call/end timeout",
        "  R/A          Rankings / all-around",
        "  F            Finalize results",
        "  1/2/3        Export pdf/xlsx/csv",
        "  X            Export rankings locally",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
