use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use rayon::prelude::*;

use crate::fixture_cache::{self, desired_fixtures};
use crate::football_api::{self, LiveApi};
use crate::h2h_stats::{aggregate_h2h, KEY_STATS};
use crate::league_cache;
use crate::normalize::{normalize_fixture, Fixture};
use crate::state::{Delta, MatchContext, ProviderCommand, StarredLeagueReq};
use crate::storage::{now_ms, KvStore};

pub const H2H_LAST: usize = 5;

/// Runs all network work off the UI thread. Commands arrive over `cmd_rx`,
/// results go back as deltas; the UI decides whether a completion still
/// applies.
pub fn spawn_provider(
    store: Arc<Mutex<KvStore>>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchLeagues => handle_fetch_leagues(&store, &tx),
                ProviderCommand::SyncStarred {
                    generation,
                    leagues,
                } => handle_sync_starred(&store, &tx, generation, &leagues),
                ProviderCommand::FetchMatch { context, season } => {
                    handle_fetch_match(&tx, &context, season)
                }
            }
        }
    });
}

fn handle_fetch_leagues(store: &Mutex<KvStore>, tx: &Sender<Delta>) {
    let result = {
        let mut store = store.lock().expect("kv store lock poisoned");
        league_cache::cached_current_leagues(&mut store, &LiveApi, now_ms())
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

/// Tops up every starred league's fixture cache and fetches its team list,
/// concurrently. One league failing never blocks the others; teams fall back
/// to an empty list and fixtures to whatever the cache already held.
fn handle_sync_starred(
    store: &Arc<Mutex<KvStore>>,
    tx: &Sender<Delta>,
    generation: u64,
    leagues: &[StarredLeagueReq],
) {
    let default_season = default_season();
    leagues
        .par_iter()
        .for_each_with(tx.clone(), |tx, request| {
            let league_id = request.league_id.as_str();
            match ensure_fixtures_shared(store, league_id, desired_fixtures()) {
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

            let season = request.season.unwrap_or(default_season);
            let teams = football_api::fetch_teams(league_id, season).unwrap_or_default();
            let _ = tx.send(Delta::SetLeagueTeams {
                generation,
                league_id: league_id.to_string(),
                teams,
            });
        });
    let _ = tx.send(Delta::StarredSyncDone { generation });
}

/// `fixture_cache::ensure_fixtures` with the store lock scoped to the store
/// operations, so the live fetch itself runs without holding the mutex.
fn ensure_fixtures_shared(
    store: &Mutex<KvStore>,
    league_id: &str,
    desired: usize,
) -> Result<Vec<Fixture>> {
    let now = now_ms();
    let mut items = {
        let mut store = store.lock().expect("kv store lock poisoned");
        fixture_cache::read_cached(&mut store, league_id, now)?
    };
    if items.len() < desired {
        if let Ok(rows) = football_api::fetch_next_fixtures(league_id, desired) {
            let mut store = store.lock().expect("kv store lock poisoned");
            items = fixture_cache::top_up_cached(&mut store, league_id, rows, now)?;
        }
    }
    items.truncate(desired);
    Ok(items)
}

/// Loads everything the match page shows: fixture meta, both teams' season
/// stats, the H2H list, and the aggregate built from per-fixture statistics.
/// Each piece degrades independently.
fn handle_fetch_match(tx: &Sender<Delta>, context: &MatchContext, season: i32) {
    let fixture_id = context.fixture_id.clone();

    match football_api::fetch_fixture_by_id(&fixture_id) {
        Ok(row) => {
            let _ = tx.send(Delta::SetMatchMeta {
                fixture_id: fixture_id.clone(),
                fixture: row.as_ref().map(normalize_fixture),
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Fixture lookup failed: {err}")));
            let _ = tx.send(Delta::SetMatchMeta {
                fixture_id: fixture_id.clone(),
                fixture: None,
            });
        }
    }

    let (home_season, away_season) = rayon::join(
        || football_api::fetch_team_season_stats(&context.league_id, &context.home_id, season),
        || football_api::fetch_team_season_stats(&context.league_id, &context.away_id, season),
    );
    let _ = tx.send(Delta::SetTeamSeasonStats {
        fixture_id: fixture_id.clone(),
        home: home_season.unwrap_or(None),
        away: away_season.unwrap_or(None),
    });

    let rows = match football_api::fetch_head_to_head(&context.home_id, &context.away_id, H2H_LAST)
    {
        Ok(rows) => rows,
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] H2H fetch failed: {err}")));
            let _ = tx.send(Delta::SetMatchH2h {
                fixture_id,
                h2h: Vec::new(),
                aggregate: Default::default(),
            });
            return;
        }
    };

    let h2h: Vec<Fixture> = rows.iter().map(normalize_fixture).collect();

    // One statistics fetch per H2H fixture; a failed or id-less entry becomes
    // None and that fixture is skipped by the aggregator.
    let bundles: Vec<_> = h2h
        .par_iter()
        .map(|fixture| {
            let id = fixture.id.as_deref()?;
            football_api::fetch_fixture_statistics(id).ok()
        })
        .collect();

    let aggregate = aggregate_h2h(&h2h, &bundles, &context.home_id, &context.away_id, KEY_STATS);
    let _ = tx.send(Delta::SetMatchH2h {
        fixture_id,
        h2h,
        aggregate,
    });
}

pub fn default_season() -> i32 {
    std::env::var("FOOTBALL_SEASON")
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(2025)
}
