use std::cell::Cell;

use anyhow::Result;
use matchday_terminal::league_cache::{
    cached_current_leagues, League, LeagueSource, LEAGUES_KEY, LEAGUES_TTL_MS,
};
use matchday_terminal::storage::KvStore;

fn league(id: &str, name: &str) -> League {
    League {
        id: id.to_string(),
        name: name.to_string(),
        kind: "league".to_string(),
        logo: String::new(),
        country: "England".to_string(),
        season: Some(2025),
    }
}

struct FakeSource {
    leagues: Vec<League>,
    calls: Cell<usize>,
}

impl FakeSource {
    fn new(leagues: Vec<League>) -> Self {
        Self {
            leagues,
            calls: Cell::new(0),
        }
    }
}

impl LeagueSource for FakeSource {
    fn current_leagues(&self) -> Result<Vec<League>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.leagues.clone())
    }
}

struct FailingSource;

impl LeagueSource for FailingSource {
    fn current_leagues(&self) -> Result<Vec<League>> {
        Err(anyhow::anyhow!("upstream down"))
    }
}

#[test]
fn fresh_cache_skips_the_fetch() {
    let mut store = KvStore::in_memory();
    let source = FakeSource::new(vec![league("39", "Premier League")]);

    let first = cached_current_leagues(&mut store, &source, 0).expect("load should succeed");
    assert_eq!(first.len(), 1);
    assert_eq!(source.calls.get(), 1);

    let second = cached_current_leagues(&mut store, &source, 1_000).expect("load should succeed");
    assert_eq!(second, first);
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn expired_cache_refetches() {
    let mut store = KvStore::in_memory();
    let source = FakeSource::new(vec![league("39", "Premier League")]);

    cached_current_leagues(&mut store, &source, 0).expect("load should succeed");
    cached_current_leagues(&mut store, &source, LEAGUES_TTL_MS).expect("load should succeed");
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn empty_cached_list_counts_as_a_miss() {
    let mut store = KvStore::in_memory();

    // An empty fetch is stored, but the next read refuses to serve it.
    let empty = FakeSource::new(Vec::new());
    let got = cached_current_leagues(&mut store, &empty, 0).expect("load should succeed");
    assert!(got.is_empty());
    assert!(store.contains_key(LEAGUES_KEY));

    let full = FakeSource::new(vec![league("39", "Premier League")]);
    let got = cached_current_leagues(&mut store, &full, 1_000).expect("load should succeed");
    assert_eq!(got.len(), 1);
    assert_eq!(full.calls.get(), 1);
}

#[test]
fn fetch_error_propagates_when_cache_is_cold() {
    let mut store = KvStore::in_memory();
    let result = cached_current_leagues(&mut store, &FailingSource, 0);
    assert!(result.is_err());
}

#[test]
fn fetch_error_after_expiry_propagates() {
    let mut store = KvStore::in_memory();
    let source = FakeSource::new(vec![league("39", "Premier League")]);
    cached_current_leagues(&mut store, &source, 0).expect("load should succeed");

    let result = cached_current_leagues(&mut store, &FailingSource, LEAGUES_TTL_MS + 1);
    assert!(result.is_err());
}
