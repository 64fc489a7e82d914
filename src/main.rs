use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchday_terminal::demo_feed::spawn_demo_provider;
use matchday_terminal::fixture_cache::{read_cached, same_fixture_sequence};
use matchday_terminal::football_api::has_api_key;
use matchday_terminal::h2h_stats::KEY_STATS;
use matchday_terminal::normalize::{kickoff_ms, pick_string, Fixture};
use matchday_terminal::provider::{default_season, spawn_provider};
use matchday_terminal::starred::StarredLeagues;
use matchday_terminal::state::{
    apply_delta, AppState, Delta, ProviderCommand, Screen, StarredLeagueReq, StarredRow, Theme,
};
use matchday_terminal::state::MatchView;
use matchday_terminal::storage::{now_ms, KvStore};

const THEME_KEY: &str = "theme";

struct App {
    state: AppState,
    store: Arc<Mutex<KvStore>>,
    starred: StarredLeagues,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    should_quit: bool,
    sweep_interval: Duration,
    last_sweep: Instant,
}

impl App {
    fn new(store: Arc<Mutex<KvStore>>, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        let sweep_secs = std::env::var("SWEEP_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(60)
            .max(10);

        let (starred, theme) = {
            let store = store.lock().expect("kv store lock poisoned");
            let starred = StarredLeagues::load(&store);
            let theme = Theme::from_storage(&store.get_json(THEME_KEY, "dark".to_string()));
            (starred, theme)
        };

        let mut state = AppState::new();
        state.theme = theme;
        state.starred = starred.ids().to_vec();
        state.starred_generation = starred.generation();

        Self {
            state,
            store,
            starred,
            cmd_tx,
            should_quit: false,
            sweep_interval: Duration::from_secs(sweep_secs),
            last_sweep: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => {
                self.state.screen = Screen::Leagues;
                self.state.clamp_selection();
            }
            KeyCode::Char('2') => {
                self.state.screen = Screen::Starred;
                self.state.clamp_selection();
            }
            KeyCode::Char('/') => {
                if self.state.screen == Screen::Leagues {
                    self.state.search_active = true;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.on_move(1),
            KeyCode::Char('k') | KeyCode::Up => self.on_move(-1),
            KeyCode::Char('s') => self.toggle_star(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('r') => self.request_leagues(),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Char('b') | KeyCode::Esc => self.on_back(),
            KeyCode::Char(' ') => {
                if let Some(view) = self.state.match_view.as_mut() {
                    view.stat_expanded = !view.stat_expanded;
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.search_active = false;
                self.state.search.clear();
                self.state.clamp_selection();
            }
            KeyCode::Enter => self.state.search_active = false,
            KeyCode::Backspace => {
                self.state.search.pop();
                self.state.clamp_selection();
            }
            KeyCode::Char(c) => {
                self.state.search.push(c);
                self.state.clamp_selection();
            }
            _ => {}
        }
    }

    fn on_move(&mut self, direction: i32) {
        match self.state.screen {
            Screen::Match { .. } => {
                if let Some(view) = self.state.match_view.as_mut() {
                    let total = KEY_STATS.len();
                    if direction > 0 {
                        view.stat_selected = (view.stat_selected + 1) % total;
                    } else if view.stat_selected == 0 {
                        view.stat_selected = total - 1;
                    } else {
                        view.stat_selected -= 1;
                    }
                }
            }
            _ => {
                if direction > 0 {
                    self.state.select_next();
                } else {
                    self.state.select_prev();
                }
            }
        }
    }

    fn on_enter(&mut self) {
        match self.state.screen {
            Screen::Leagues => self.toggle_star(),
            Screen::Starred => self.open_selected_match(),
            Screen::Match { .. } => {
                if let Some(view) = self.state.match_view.as_mut() {
                    view.stat_expanded = !view.stat_expanded;
                }
            }
        }
    }

    fn on_back(&mut self) {
        match self.state.screen {
            Screen::Match { .. } => {
                self.state.screen = Screen::Starred;
                self.state.match_view = None;
                self.state.clamp_selection();
            }
            Screen::Starred => {
                self.state.screen = Screen::Leagues;
                self.state.clamp_selection();
            }
            Screen::Leagues => {}
        }
    }

    /// Star or unstar whatever league the cursor is on, then resync.
    fn toggle_star(&mut self) {
        let league_id = match self.state.screen {
            Screen::Leagues => self.state.selected_league_id(),
            Screen::Starred => match self.state.starred_rows().get(self.state.starred_selected) {
                Some(StarredRow::League(id)) => Some(id.clone()),
                Some(StarredRow::Fixture { league_id, .. }) => Some(league_id.clone()),
                None => None,
            },
            Screen::Match { .. } => None,
        };
        let Some(league_id) = league_id else {
            return;
        };

        let result = {
            let mut store = self.store.lock().expect("kv store lock poisoned");
            self.starred.toggle(&mut store, &league_id)
        };
        if let Err(err) = result {
            self.state.push_log(format!("[WARN] Star write failed: {err}"));
            return;
        }

        self.state.starred = self.starred.ids().to_vec();
        self.state.starred_generation = self.starred.generation();
        self.state
            .fixtures_by_league
            .retain(|id, _| self.starred.is_starred(id));
        self.state
            .teams_by_league
            .retain(|id, _| self.starred.is_starred(id));
        self.state.clamp_selection();
        self.request_sync_starred();
    }

    fn toggle_theme(&mut self) {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        let result = {
            let mut store = self.store.lock().expect("kv store lock poisoned");
            store.set_json(THEME_KEY, &theme.storage_value())
        };
        if let Err(err) = result {
            self.state
                .push_log(format!("[WARN] Theme write failed: {err}"));
        }
    }

    fn request_leagues(&mut self) {
        self.state.leagues_loading = true;
        if self.cmd_tx.send(ProviderCommand::FetchLeagues).is_err() {
            self.state.leagues_loading = false;
            self.state.push_log("[WARN] League request failed");
        }
    }

    fn request_sync_starred(&mut self) {
        if self.starred.is_empty() {
            self.state.fixtures_loading = false;
            return;
        }
        let leagues: Vec<StarredLeagueReq> = self
            .starred
            .ids()
            .iter()
            .map(|id| StarredLeagueReq {
                league_id: id.clone(),
                season: self.state.league_by_id(id).and_then(|l| l.season),
            })
            .collect();
        self.state.fixtures_loading = true;
        let sent = self.cmd_tx.send(ProviderCommand::SyncStarred {
            generation: self.state.starred_generation,
            leagues,
        });
        if sent.is_err() {
            self.state.fixtures_loading = false;
            self.state.push_log("[WARN] Starred sync request failed");
        }
    }

    fn open_selected_match(&mut self) {
        let Some(context) = self.state.selected_match_context() else {
            self.state.push_log("[INFO] Fixture is missing match ids");
            return;
        };
        let season = self
            .state
            .league_by_id(&context.league_id)
            .and_then(|l| l.season)
            .unwrap_or_else(default_season);
        self.state.screen = Screen::Match {
            fixture_id: context.fixture_id.clone(),
        };
        self.state.match_view = Some(MatchView::new(context.clone()));
        if self
            .cmd_tx
            .send(ProviderCommand::FetchMatch { context, season })
            .is_err()
        {
            self.state.push_log("[WARN] Match request failed");
        }
    }

    /// Periodic local sweep: re-read each starred league's fixture cache so
    /// fixtures whose kickoff has passed fall off. No network involved; state
    /// only changes when the id sequence actually differs.
    fn maybe_sweep(&mut self) {
        if self.last_sweep.elapsed() < self.sweep_interval {
            return;
        }
        self.last_sweep = Instant::now();
        let now = now_ms();
        let ids: Vec<String> = self.state.starred.clone();
        for league_id in ids {
            let fresh = {
                let mut store = self.store.lock().expect("kv store lock poisoned");
                read_cached(&mut store, &league_id, now)
            };
            let Ok(fresh) = fresh else {
                continue;
            };
            let current = self
                .state
                .fixtures_by_league
                .get(&league_id)
                .map(|f| f.as_slice())
                .unwrap_or(&[]);
            if !same_fixture_sequence(current, &fresh) {
                self.state.fixtures_by_league.insert(league_id, fresh);
                self.state.clamp_selection();
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let store = Arc::new(Mutex::new(KvStore::open()));
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if has_api_key() {
        spawn_provider(store.clone(), tx, cmd_rx);
    } else {
        spawn_demo_provider(store.clone(), tx, cmd_rx);
    }

    let mut app = App::new(store, cmd_tx);
    app.request_leagues();
    app.request_sync_starred();
    let res = run_app(&mut terminal, &mut app, rx);

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

        app.maybe_sweep();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
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

fn text_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().fg(Color::White),
        Theme::Light => Style::default().fg(Color::Black),
    }
}

fn dim_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().fg(Color::DarkGray),
        Theme::Light => Style::default().fg(Color::Gray),
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(text_style(app.state.theme).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Leagues => render_leagues(frame, chunks[1], &app.state),
        Screen::Starred => render_starred(frame, chunks[1], &app.state),
        Screen::Match { .. } => render_match(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state)).style(dim_style(app.state.theme));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match &state.screen {
        Screen::Leagues => "LEAGUES".to_string(),
        Screen::Starred => "STARRED".to_string(),
        Screen::Match { .. } => "MATCH".to_string(),
    };
    let search = if state.search_active || !state.search.is_empty() {
        format!(" | Search: {}_", state.search)
    } else {
        String::new()
    };
    format!(
        "MATCHDAY | {screen} | Theme: {}{search}",
        state.theme.storage_value()
    )
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to filter | Enter Keep | Esc Clear".to_string();
    }
    match state.screen {
        Screen::Leagues => {
            "1 Leagues | 2 Starred | j/k Move | / Search | s/Enter Star | r Refresh | t Theme | ? Help | q Quit"
                .to_string()
        }
        Screen::Starred => {
            "1 Leagues | 2 Starred | j/k Move | Enter Open | s Unstar | b/Esc Back | t Theme | ? Help | q Quit"
                .to_string()
        }
        Screen::Match { .. } => {
            "j/k Stat | Enter/Space Expand | b/Esc Back | t Theme | ? Help | q Quit".to_string()
        }
    }
}

fn render_leagues(frame: &mut Frame, area: Rect, state: &AppState) {
    let base = text_style(state.theme);
    let dim = dim_style(state.theme);

    if state.leagues_loading && state.leagues.is_empty() {
        frame.render_widget(Paragraph::new("Loading leagues...").style(dim), area);
        return;
    }
    if let Some(err) = &state.leagues_error {
        let msg = format!("Could not load leagues: {err}\nPress r to retry");
        frame.render_widget(Paragraph::new(msg).style(base.fg(Color::Red)), area);
        return;
    }

    let filtered = state.filtered_leagues();
    if filtered.is_empty() {
        frame.render_widget(Paragraph::new("No leagues match").style(dim), area);
        return;
    }

    let visible = area.height as usize;
    let (start, end) = visible_range(state.selected, filtered.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let league = filtered[idx];
        let cursor = if idx == state.selected { "> " } else { "  " };
        let star = if state.starred.iter().any(|id| *id == league.id) {
            "*"
        } else {
            " "
        };
        let season = league
            .season
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        lines.push(format!(
            "{cursor}[{star}] {:<32} {:<16} {:<6} {season}",
            truncated(&league.name, 32),
            truncated(&league.country, 16),
            truncated(&league.kind, 6),
        ));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")).style(base), area);
}

fn render_starred(frame: &mut Frame, area: Rect, state: &AppState) {
    let base = text_style(state.theme);
    let dim = dim_style(state.theme);

    if state.starred.is_empty() {
        frame.render_widget(
            Paragraph::new("No starred leagues yet. Star some on the Leagues screen.").style(dim),
            area,
        );
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(4)])
        .split(area);

    let rows = state.starred_rows();
    let now = now_ms();
    let visible = sections[0].height as usize;
    let (start, end) = visible_range(state.starred_selected, rows.len(), visible);
    let mut lines: Vec<Line> = Vec::new();
    for idx in start..end {
        let cursor = if idx == state.starred_selected {
            "> "
        } else {
            "  "
        };
        match &rows[idx] {
            StarredRow::League(league_id) => {
                let label = state
                    .league_by_id(league_id)
                    .map(|l| format!("{} ({})", l.name, l.country))
                    .unwrap_or_else(|| format!("League {league_id}"));
                let suffix = if state.fixtures_loading {
                    "  syncing..."
                } else {
                    ""
                };
                lines.push(Line::styled(
                    format!("{cursor}* {label}{suffix}"),
                    base.add_modifier(Modifier::BOLD),
                ));
                if let Some(summary) = state.team_summary(league_id) {
                    lines.push(Line::styled(format!("      {summary}"), dim));
                }
            }
            StarredRow::Fixture { league_id, index } => {
                let Some(fixture) = state
                    .fixtures_by_league
                    .get(league_id)
                    .and_then(|f| f.get(*index))
                else {
                    continue;
                };
                lines.push(Line::styled(
                    format!("{cursor}    {}", fixture_line(fixture, now)),
                    base,
                ));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines), sections[0]);

    let console = Paragraph::new(console_text(state))
        .style(dim)
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, sections[1]);
}

fn fixture_line(fixture: &Fixture, now: i64) -> String {
    let countdown = kickoff_ms(fixture)
        .map(|kick| format_countdown(kick, now))
        .unwrap_or_else(|| "TBD".to_string());
    format!(
        "{:<24} vs {:<24} {countdown}",
        truncated(&fixture.home.name, 24),
        truncated(&fixture.away.name, 24),
    )
}

fn render_match(frame: &mut Frame, area: Rect, state: &AppState) {
    let base = text_style(state.theme);
    let dim = dim_style(state.theme);

    let Some(view) = &state.match_view else {
        frame.render_widget(Paragraph::new("No match open").style(dim), area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(area);

    let now = now_ms();
    let meta = match &view.fixture {
        Some(fixture) => {
            let countdown = kickoff_ms(fixture)
                .map(|kick| format_countdown(kick, now))
                .unwrap_or_else(|| "TBD".to_string());
            let date = fixture.date.as_deref().unwrap_or("unknown date");
            format!(
                "{} vs {}\nKickoff: {date}  ({countdown})\nSeason stats: home {} | away {}",
                fixture.home.name,
                fixture.away.name,
                presence(view.home_season_stats.is_some()),
                presence(view.away_season_stats.is_some()),
            )
        }
        None if view.loading => "Loading match...".to_string(),
        None => {
            // Fixture lookup came back empty; fall back to whatever the
            // season-stats payloads know about the two teams.
            let home = season_team_name(&view.home_season_stats)
                .unwrap_or_else(|| format!("Team {}", view.context.home_id));
            let away = season_team_name(&view.away_season_stats)
                .unwrap_or_else(|| format!("Team {}", view.context.away_id));
            format!("{home} vs {away}\nFixture details unavailable")
        }
    };
    let header = Paragraph::new(meta)
        .style(base)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, sections[0]);

    if view.stat_expanded {
        render_stat_series(frame, sections[1], state, view);
    } else {
        render_stat_table(frame, sections[1], state, view);
    }

    let red_cards = red_card_text(view);
    let red = Paragraph::new(red_cards)
        .style(base)
        .block(Block::default().title("Red Cards").borders(Borders::TOP));
    frame.render_widget(red, sections[2]);
}

fn render_stat_table(frame: &mut Frame, area: Rect, state: &AppState, view: &MatchView) {
    let base = text_style(state.theme);
    let dim = dim_style(state.theme);

    let Some(aggregate) = &view.aggregate else {
        let msg = if view.loading {
            "Crunching head-to-head history..."
        } else {
            "No head-to-head data"
        };
        frame.render_widget(Paragraph::new(msg).style(dim), area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::styled(
        format!("  {:<20} {:>8} {:>8}", "Stat (H2H avg)", "Home", "Away"),
        base.add_modifier(Modifier::BOLD),
    ));
    for (idx, name) in KEY_STATS.iter().enumerate() {
        let cursor = if idx == view.stat_selected { "> " } else { "  " };
        let (home, away) = aggregate
            .averages
            .get(*name)
            .map(|avg| (format!("{:.2}", avg.home), format!("{:.2}", avg.away)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        let style = if idx == view.stat_selected {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        lines.push(Line::styled(
            format!("{cursor}{:<20} {:>8} {:>8}", stat_label(name), home, away),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_stat_series(frame: &mut Frame, area: Rect, state: &AppState, view: &MatchView) {
    let base = text_style(state.theme);
    let dim = dim_style(state.theme);

    let name = KEY_STATS[view.stat_selected.min(KEY_STATS.len() - 1)];
    let points = view
        .aggregate
        .as_ref()
        .and_then(|a| a.series.get(name))
        .map(|p| p.as_slice())
        .unwrap_or(&[]);

    if points.is_empty() {
        frame.render_widget(
            Paragraph::new(format!("No per-match data for {}", stat_label(name))).style(dim),
            area,
        );
        return;
    }

    let mut lines = vec![format!("{} per head-to-head match:", stat_label(name))];
    for point in points {
        let date = point.date.as_deref().unwrap_or("unknown");
        lines.push(format!(
            "  {:<25} {:>6.2} {}  -  {:>6.2} {}",
            truncated(date, 25),
            point.home_value,
            truncated(&point.home_name, 18),
            point.away_value,
            truncated(&point.away_name, 18),
        ));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")).style(base), area);
}

fn red_card_text(view: &MatchView) -> String {
    let events = view
        .aggregate
        .as_ref()
        .map(|a| a.red_card_events.as_slice())
        .unwrap_or(&[]);
    if events.is_empty() {
        return "No red cards in recent meetings".to_string();
    }
    events
        .iter()
        .map(|event| {
            let date = event.date.as_deref().unwrap_or("unknown");
            format!(
                "{date}: {} {:.0} - {:.0} {}",
                event.home.name, event.home.count, event.away.count, event.away.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn season_team_name(stats: &Option<serde_json::Value>) -> Option<String> {
    pick_string(stats.as_ref()?.get("team")?, &["name"])
}

fn stat_label(name: &str) -> &str {
    if name == "expected_goals" {
        "Expected Goals"
    } else {
        name
    }
}

fn presence(present: bool) -> &'static str {
    if present {
        "loaded"
    } else {
        "n/a"
    }
}

/// "2d 05:30:00" style countdown; anything at or past kickoff reads as live.
fn format_countdown(kickoff_ms: i64, now_ms: i64) -> String {
    let remaining = kickoff_ms - now_ms;
    if remaining <= 0 {
        return "Live / Started".to_string();
    }
    let secs = remaining / 1000;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Terminal - Help",
        "",
        "Global:",
        "  1            Leagues",
        "  2            Starred",
        "  j/k or ↑/↓   Move",
        "  t            Toggle theme",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Leagues:",
        "  /            Search by name, country, or type",
        "  s / Enter    Star or unstar",
        "  r            Refresh league list",
        "",
        "Starred:",
        "  Enter        Open match page",
        "  s            Unstar",
        "",
        "Match:",
        "  j/k          Select statistic",
        "  Enter/Space  Expand per-match series",
        "  b / Esc      Back",
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
