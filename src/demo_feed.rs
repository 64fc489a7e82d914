use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use rand::Rng;
use serde_json::{json, Value};

use crate::fixture_cache::{self, desired_fixtures, FixtureSource};
use crate::football_api::{FixtureStatistics, TeamFixtureStats, TeamInfo};
use crate::h2h_stats::{aggregate_h2h, KEY_STATS};
use crate::league_cache::{self, League, LeagueSource};
use crate::normalize::normalize_fixture;
use crate::provider::H2H_LAST;
use crate::state::{Delta, MatchContext, ProviderCommand, StarredLeagueReq};
use crate::storage::{now_ms, KvStore};

/// Offline data source used when no API key is configured. Exercises the
/// same cache paths as the live client against synthesized payloads.
#[derive(Debug, Clone, Copy)]
pub struct DemoApi;

const DEMO_LEAGUES: &[(&str, &str, &str, &str)] = &[
    ("39", "Premier League", "England", "league"),
    ("140", "La Liga", "Spain", "league"),
    ("78", "Bundesliga", "Germany", "league"),
    ("135", "Serie A", "Italy", "league"),
    ("61", "Ligue 1", "France", "league"),
    ("2", "Champions League", "World", "cup"),
];

const DEMO_TEAMS: &[(&str, &str)] = &[
    ("50", "Riverton FC"),
    ("51", "Harbour United"),
    ("52", "Northgate Athletic"),
    ("53", "Stonebridge City"),
    ("54", "Eastvale Rovers"),
    ("55", "Westmoor Town"),
];

impl LeagueSource for DemoApi {
    fn current_leagues(&self) -> Result<Vec<League>> {
        Ok(DEMO_LEAGUES
            .iter()
            .map(|(id, name, country, kind)| League {
                id: id.to_string(),
                name: name.to_string(),
                kind: kind.to_string(),
                logo: String::new(),
                country: country.to_string(),
                season: Some(2025),
            })
            .collect())
    }
}

impl FixtureSource for DemoApi {
    fn next_fixtures(&self, league_id: &str, count: usize) -> Result<Vec<Value>> {
        let now = Utc::now();
        let mut rows = Vec::with_capacity(count);
        for i in 0..count {
            let (home, away) = demo_pairing(league_id, i);
            let kickoff = now + ChronoDuration::hours(6 * (i as i64 + 1));
            // API-fixture shape on purpose, so the normalizer path is the
            // same one live data takes.
            rows.push(json!({
                "fixture": {
                    "id": demo_fixture_id(league_id, i),
                    "date": kickoff.to_rfc3339_opts(SecondsFormat::Secs, true),
                },
                "league": { "id": league_id },
                "teams": {
                    "home": { "id": home.0, "name": home.1, "logo": "" },
                    "away": { "id": away.0, "name": away.1, "logo": "" },
                },
            }));
        }
        Ok(rows)
    }
}

fn demo_pairing(league_id: &str, index: usize) -> ((&'static str, &'static str), (&'static str, &'static str)) {
    let seed = league_id.len() + index;
    let home = DEMO_TEAMS[seed % DEMO_TEAMS.len()];
    let away = DEMO_TEAMS[(seed + 1) % DEMO_TEAMS.len()];
    (home, away)
}

fn demo_fixture_id(league_id: &str, index: usize) -> i64 {
    let base: i64 = league_id.parse().unwrap_or(900);
    base * 1000 + index as i64
}

/// Provider thread for demo mode: same commands, same deltas, no network.
pub fn spawn_demo_provider(
    store: Arc<Mutex<KvStore>>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(
            "[INFO] Demo mode: no FOOTBALL_API_KEY, serving synthetic data".to_string(),
        ));
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchLeagues => {
                    let result = {
                        let mut store = store.lock().expect("kv store lock poisoned");
                        league_cache::cached_current_leagues(&mut store, &DemoApi, now_ms())
                    };
                    match result {
                        Ok(leagues) => {
                            let _ = tx.send(Delta::SetLeagues(leagues));
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::LeaguesFailed(err.to_string()));
                        }
                    }
                }
                ProviderCommand::SyncStarred {
                    generation,
                    leagues,
                } => {
                    sync_starred(&store, &tx, generation, &leagues);
                }
                ProviderCommand::FetchMatch { context, .. } => {
                    fetch_match(&tx, &context);
                }
            }
        }
    });
}

fn sync_starred(
    store: &Mutex<KvStore>,
    tx: &Sender<Delta>,
    generation: u64,
    leagues: &[StarredLeagueReq],
) {
    for request in leagues {
        let league_id = request.league_id.as_str();
        let result = {
            let mut store = store.lock().expect("kv store lock poisoned");
            fixture_cache::ensure_fixtures(
                &mut store,
                &DemoApi,
                league_id,
                desired_fixtures(),
                now_ms(),
            )
        };
        match result {
            Ok(fixtures) => {
                let _ = tx.send(Delta::SetLeagueFixtures {
                    generation,
                    league_id: league_id.to_string(),
                    fixtures,
                });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Fixture cache write failed for league {league_id}: {err}"
                )));
            }
        }
        let _ = tx.send(Delta::SetLeagueTeams {
            generation,
            league_id: league_id.to_string(),
            teams: demo_teams(),
        });
    }
    let _ = tx.send(Delta::StarredSyncDone { generation });
}

fn demo_teams() -> Vec<TeamInfo> {
    DEMO_TEAMS
        .iter()
        .map(|(id, name)| TeamInfo {
            id: Some(id.to_string()),
            name: name.to_string(),
            code: String::new(),
            country: "Demoland".to_string(),
            logo: String::new(),
        })
        .collect()
}

fn fetch_match(tx: &Sender<Delta>, context: &MatchContext) {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let fixture_id = context.fixture_id.clone();

    let home_name = demo_team_name(&context.home_id);
    let away_name = demo_team_name(&context.away_id);

    let meta = json!({
        "id": fixture_id,
        "date": (now + ChronoDuration::hours(12)).to_rfc3339_opts(SecondsFormat::Secs, true),
        "home": { "id": context.home_id, "name": home_name, "logo": "" },
        "away": { "id": context.away_id, "name": away_name, "logo": "" },
    });
    let _ = tx.send(Delta::SetMatchMeta {
        fixture_id: fixture_id.clone(),
        fixture: Some(normalize_fixture(&meta)),
    });

    let _ = tx.send(Delta::SetTeamSeasonStats {
        fixture_id: fixture_id.clone(),
        home: None,
        away: None,
    });

    let mut h2h = Vec::with_capacity(H2H_LAST);
    let mut bundles = Vec::with_capacity(H2H_LAST);
    for i in 0..H2H_LAST {
        let played = now - ChronoDuration::days(90 * (i as i64 + 1));
        let row = json!({
            "id": format!("{fixture_id}-h2h-{i}"),
            "date": played.to_rfc3339_opts(SecondsFormat::Secs, true),
            "home": { "id": context.home_id, "name": home_name, "logo": "" },
            "away": { "id": context.away_id, "name": away_name, "logo": "" },
        });
        h2h.push(normalize_fixture(&row));
        bundles.push(Some(demo_statistics(context, &mut rng)));
    }

    let aggregate = aggregate_h2h(&h2h, &bundles, &context.home_id, &context.away_id, KEY_STATS);
    let _ = tx.send(Delta::SetMatchH2h {
        fixture_id,
        h2h,
        aggregate,
    });
}

fn demo_team_name(team_id: &str) -> String {
    DEMO_TEAMS
        .iter()
        .find(|(id, _)| *id == team_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Team {team_id}"))
}

fn demo_statistics(context: &MatchContext, rng: &mut impl Rng) -> FixtureStatistics {
    let mut out = FixtureStatistics::new();
    for team_id in [&context.home_id, &context.away_id] {
        let mut stats = std::collections::HashMap::new();
        for name in KEY_STATS {
            let value = match *name {
                "Ball Possession" => rng.gen_range(30.0..70.0),
                "expected_goals" => rng.gen_range(0.0..3.5),
                "Red Cards" => {
                    if rng.gen_bool(0.15) {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => rng.gen_range(0..15) as f64,
            };
            stats.insert(name.to_string(), Some((value * 100.0).round() / 100.0));
        }
        out.insert(
            team_id.to_string(),
            TeamFixtureStats {
                id: team_id.to_string(),
                name: demo_team_name(team_id),
                logo: String::new(),
                stats,
            },
        );
    }
    out
}
