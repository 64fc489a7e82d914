use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::storage::KvStore;

pub const LEAGUES_KEY: &str = "leagues:current";
pub const LEAGUES_TTL_MS: i64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    /// "league" or "cup" in the upstream data.
    pub kind: String,
    pub logo: String,
    pub country: String,
    pub season: Option<i32>,
}

/// Source of the current-league list (live API, demo feed, test fakes).
pub trait LeagueSource {
    fn current_leagues(&self) -> Result<Vec<League>>;
}

/// Returns the cached league list when the 30-day TTL entry holds a non-empty
/// list, otherwise fetches and re-caches. Fetch errors propagate; this is the
/// one cache-less load the UI surfaces as an error.
///
/// An empty successful fetch is still stored, but an empty cached array reads
/// as a miss here, so a transient empty payload never sticks for the full TTL.
pub fn cached_current_leagues(
    store: &mut KvStore,
    source: &dyn LeagueSource,
    now_ms: i64,
) -> Result<Vec<League>> {
    if let Some(cached) = store.get_with_ttl_at::<Vec<League>>(LEAGUES_KEY, now_ms) {
        if !cached.is_empty() {
            return Ok(cached);
        }
    }
    let leagues = source.current_leagues()?;
    store.set_with_ttl_at(LEAGUES_KEY, &leagues, LEAGUES_TTL_MS, now_ms)?;
    Ok(leagues)
}
