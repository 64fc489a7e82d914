use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::football_api::TeamInfo;
use crate::h2h_stats::H2hAggregate;
use crate::league_cache::League;
use crate::normalize::Fixture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Leagues,
    Starred,
    Match { fixture_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_storage(raw: &str) -> Self {
        if raw == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Everything needed to load a match page: the fixture plus the two team ids
/// and the league it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    pub fixture_id: String,
    pub league_id: String,
    pub home_id: String,
    pub away_id: String,
}

#[derive(Debug, Clone)]
pub struct MatchView {
    pub context: MatchContext,
    pub fixture: Option<Fixture>,
    pub h2h: Vec<Fixture>,
    pub aggregate: Option<H2hAggregate>,
    pub home_season_stats: Option<Value>,
    pub away_season_stats: Option<Value>,
    pub loading: bool,
    pub stat_selected: usize,
    pub stat_expanded: bool,
}

impl MatchView {
    pub fn new(context: MatchContext) -> Self {
        Self {
            context,
            fixture: None,
            h2h: Vec::new(),
            aggregate: None,
            home_season_stats: None,
            away_season_stats: None,
            loading: true,
            stat_selected: 0,
            stat_expanded: false,
        }
    }
}

/// A row on the Starred screen: either a league header or one of its
/// upcoming fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarredRow {
    League(String),
    Fixture { league_id: String, index: usize },
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub theme: Theme,
    pub leagues: Vec<League>,
    pub leagues_loading: bool,
    pub leagues_error: Option<String>,
    pub search: String,
    pub search_active: bool,
    pub selected: usize,
    /// Mirror of the starred register for rendering and liveness checks.
    pub starred: Vec<String>,
    pub starred_generation: u64,
    pub starred_selected: usize,
    pub fixtures_by_league: HashMap<String, Vec<Fixture>>,
    pub teams_by_league: HashMap<String, Vec<TeamInfo>>,
    pub fixtures_loading: bool,
    pub match_view: Option<MatchView>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Leagues,
            theme: Theme::Dark,
            leagues: Vec::new(),
            leagues_loading: true,
            leagues_error: None,
            search: String::new(),
            search_active: false,
            selected: 0,
            starred: Vec::new(),
            starred_generation: 0,
            starred_selected: 0,
            fixtures_by_league: HashMap::new(),
            teams_by_league: HashMap::new(),
            fixtures_loading: false,
            match_view: None,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Leagues matching the search box, by name, country, or kind.
    pub fn filtered_leagues(&self) -> Vec<&League> {
        let query = self.search.trim().to_lowercase();
        self.leagues
            .iter()
            .filter(|l| {
                if query.is_empty() {
                    return true;
                }
                format!("{} {} {}", l.name, l.country, l.kind)
                    .to_lowercase()
                    .contains(&query)
            })
            .collect()
    }

    pub fn selected_league_id(&self) -> Option<String> {
        self.filtered_leagues()
            .get(self.selected)
            .map(|l| l.id.clone())
    }

    pub fn league_by_id(&self, id: &str) -> Option<&League> {
        self.leagues.iter().find(|l| l.id == id)
    }

    /// Flattened rows for the Starred screen, in starred order.
    pub fn starred_rows(&self) -> Vec<StarredRow> {
        let mut rows = Vec::new();
        for id in &self.starred {
            rows.push(StarredRow::League(id.clone()));
            let count = self
                .fixtures_by_league
                .get(id)
                .map(|f| f.len())
                .unwrap_or(0);
            for index in 0..count {
                rows.push(StarredRow::Fixture {
                    league_id: id.clone(),
                    index,
                });
            }
        }
        rows
    }

    /// Roster line shown under a starred league header once its team list
    /// has synced. None until then, or when the league has no teams.
    pub fn team_summary(&self, league_id: &str) -> Option<String> {
        const SHOWN: usize = 6;
        let teams = self.teams_by_league.get(league_id)?;
        if teams.is_empty() {
            return None;
        }
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).take(SHOWN).collect();
        let mut line = format!("{} teams: {}", teams.len(), names.join(", "));
        if teams.len() > SHOWN {
            line.push_str(", ...");
        }
        Some(line)
    }

    /// Match context for the currently selected fixture row, when every id
    /// needed for the match page is present.
    pub fn selected_match_context(&self) -> Option<MatchContext> {
        let rows = self.starred_rows();
        let StarredRow::Fixture { league_id, index } = rows.get(self.starred_selected)? else {
            return None;
        };
        let fixture = self.fixtures_by_league.get(league_id)?.get(*index)?;
        Some(MatchContext {
            fixture_id: fixture.id.clone()?,
            league_id: league_id.clone(),
            home_id: fixture.home.id.clone()?,
            away_id: fixture.away.id.clone()?,
        })
    }

    pub fn select_next(&mut self) {
        let total = self.selection_total();
        let Some(slot) = self.selection_slot() else {
            return;
        };
        if total == 0 {
            *slot = 0;
            return;
        }
        *slot = (*slot + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.selection_total();
        let Some(slot) = self.selection_slot() else {
            return;
        };
        if total == 0 {
            *slot = 0;
            return;
        }
        if *slot == 0 {
            *slot = total - 1;
        } else {
            *slot -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.selection_total();
        let Some(slot) = self.selection_slot() else {
            return;
        };
        if total == 0 {
            *slot = 0;
        } else if *slot >= total {
            *slot = total - 1;
        }
    }

    fn selection_total(&self) -> usize {
        match self.screen {
            Screen::Leagues => self.filtered_leagues().len(),
            Screen::Starred => self.starred_rows().len(),
            Screen::Match { .. } => 0,
        }
    }

    fn selection_slot(&mut self) -> Option<&mut usize> {
        match self.screen {
            Screen::Leagues => Some(&mut self.selected),
            Screen::Starred => Some(&mut self.starred_selected),
            Screen::Match { .. } => None,
        }
    }
}

/// League + current season pair for a starred-league sync request.
#[derive(Debug, Clone)]
pub struct StarredLeagueReq {
    pub league_id: String,
    pub season: Option<i32>,
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchLeagues,
    SyncStarred {
        generation: u64,
        leagues: Vec<StarredLeagueReq>,
    },
    FetchMatch {
        context: MatchContext,
        season: i32,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetLeagues(Vec<League>),
    LeaguesFailed(String),
    SetLeagueFixtures {
        generation: u64,
        league_id: String,
        fixtures: Vec<Fixture>,
    },
    SetLeagueTeams {
        generation: u64,
        league_id: String,
        teams: Vec<TeamInfo>,
    },
    StarredSyncDone {
        generation: u64,
    },
    SetMatchMeta {
        fixture_id: String,
        fixture: Option<Fixture>,
    },
    SetMatchH2h {
        fixture_id: String,
        h2h: Vec<Fixture>,
        aggregate: H2hAggregate,
    },
    SetTeamSeasonStats {
        fixture_id: String,
        home: Option<Value>,
        away: Option<Value>,
    },
    Log(String),
}

/// Applies a provider delta. Completions carry the context they were started
/// for; anything that no longer matches current state is discarded instead of
/// applied (the starred set moved on, or the user left the match page).
pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetLeagues(leagues) => {
            state.leagues = leagues;
            state.leagues_loading = false;
            state.leagues_error = None;
            state.clamp_selection();
        }
        Delta::LeaguesFailed(message) => {
            state.leagues_loading = false;
            if state.leagues.is_empty() {
                state.leagues_error = Some(message);
            } else {
                state.push_log(format!("[WARN] League refresh failed: {message}"));
            }
        }
        Delta::SetLeagueFixtures {
            generation,
            league_id,
            fixtures,
        } => {
            if generation != state.starred_generation {
                return;
            }
            if !state.starred.iter().any(|id| *id == league_id) {
                return;
            }
            state.fixtures_by_league.insert(league_id, fixtures);
            state.clamp_selection();
        }
        Delta::SetLeagueTeams {
            generation,
            league_id,
            teams,
        } => {
            if generation != state.starred_generation {
                return;
            }
            if !state.starred.iter().any(|id| *id == league_id) {
                return;
            }
            state.teams_by_league.insert(league_id, teams);
        }
        Delta::StarredSyncDone { generation } => {
            if generation == state.starred_generation {
                state.fixtures_loading = false;
            }
        }
        Delta::SetMatchMeta {
            fixture_id,
            fixture,
        } => {
            if let Some(view) = current_match_view(state, &fixture_id) {
                view.fixture = fixture;
            }
        }
        Delta::SetMatchH2h {
            fixture_id,
            h2h,
            aggregate,
        } => {
            if let Some(view) = current_match_view(state, &fixture_id) {
                view.h2h = h2h;
                view.aggregate = Some(aggregate);
                view.loading = false;
            }
        }
        Delta::SetTeamSeasonStats {
            fixture_id,
            home,
            away,
        } => {
            if let Some(view) = current_match_view(state, &fixture_id) {
                view.home_season_stats = home;
                view.away_season_stats = away;
            }
        }
        Delta::Log(message) => state.push_log(message),
    }
}

fn current_match_view<'a>(state: &'a mut AppState, fixture_id: &str) -> Option<&'a mut MatchView> {
    if !matches!(&state.screen, Screen::Match { fixture_id: id } if id == fixture_id) {
        return None;
    }
    state
        .match_view
        .as_mut()
        .filter(|view| view.context.fixture_id == fixture_id)
}
