use std::collections::HashSet;

use anyhow::Result;
use serde_json::Value;

use crate::normalize::{kickoff_ms, normalize_fixture, Fixture};
use crate::storage::KvStore;

pub const FIXTURES_KEY_PREFIX: &str = "fixtures:league:";
pub const DESIRED_FIXTURES: usize = 10;

/// Target cache depth per league, tunable via FIXTURES_DESIRED.
pub fn desired_fixtures() -> usize {
    std::env::var("FIXTURES_DESIRED")
        .ok()
        .and_then(|val| val.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DESIRED_FIXTURES)
}

/// Source of upcoming fixtures for one league. Implemented by the live API
/// client, the demo feed, and test fakes.
pub trait FixtureSource {
    fn next_fixtures(&self, league_id: &str, count: usize) -> Result<Vec<Value>>;
}

pub fn fixtures_key(league_id: &str) -> String {
    format!("{FIXTURES_KEY_PREFIX}{league_id}")
}

/// Reads the per-league cache, normalizing every entry and dropping fixtures
/// whose kickoff is not strictly in the future. When anything was dropped the
/// pruned list is written back, so a second read returns the same content.
pub fn read_cached(store: &mut KvStore, league_id: &str, now_ms: i64) -> Result<Vec<Fixture>> {
    let key = fixtures_key(league_id);
    let rows: Vec<Value> = store.get_json(&key, Vec::new());
    let total = rows.len();
    let kept: Vec<Fixture> = rows
        .iter()
        .map(normalize_fixture)
        .filter(|f| kickoff_ms(f).is_some_and(|ts| ts > now_ms))
        .collect();
    if kept.len() != total {
        store.set_json(&key, &kept)?;
    }
    Ok(kept)
}

/// Normalizes and stores the given rows verbatim, de-duplicated by fixture id
/// (first occurrence wins; id-less rows are kept as-is).
pub fn write_cached(store: &mut KvStore, league_id: &str, rows: &[Value]) -> Result<()> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut fixtures: Vec<Fixture> = Vec::with_capacity(rows.len());
    for row in rows {
        let fixture = normalize_fixture(row);
        if let Some(id) = fixture.id.as_ref() {
            if !seen.insert(id.clone()) {
                continue;
            }
        }
        fixtures.push(fixture);
    }
    store.set_json(&fixtures_key(league_id), &fixtures)
}

/// Applies one fetched batch to the cache: keeps future kickoffs only, writes
/// them, and returns the pruned read-back. Every top-up path funnels through
/// here so the filter policy lives in one place.
pub fn top_up_cached(
    store: &mut KvStore,
    league_id: &str,
    rows: Vec<Value>,
    now_ms: i64,
) -> Result<Vec<Fixture>> {
    let fresh: Vec<Value> = rows
        .into_iter()
        .filter(|row| kickoff_ms(&normalize_fixture(row)).is_some_and(|ts| ts > now_ms))
        .collect();
    write_cached(store, league_id, &fresh)?;
    read_cached(store, league_id, now_ms)
}

/// Makes sure the cache holds up to `desired` future fixtures, topping up from
/// the live source when it runs thin. A fetch failure keeps the existing cache
/// untouched; only store writes can error out of here. Returns at most
/// `desired` entries.
pub fn ensure_fixtures(
    store: &mut KvStore,
    source: &dyn FixtureSource,
    league_id: &str,
    desired: usize,
    now_ms: i64,
) -> Result<Vec<Fixture>> {
    let mut items = read_cached(store, league_id, now_ms)?;
    if items.len() < desired {
        if let Ok(rows) = source.next_fixtures(league_id, desired) {
            items = top_up_cached(store, league_id, rows, now_ms)?;
        }
    }
    items.truncate(desired);
    Ok(items)
}

/// True when both lists carry the same fixture ids in the same order. The
/// periodic sweep uses this to skip state updates that would change nothing.
pub fn same_fixture_sequence(a: &[Fixture], b: &[Fixture]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id == y.id)
}
