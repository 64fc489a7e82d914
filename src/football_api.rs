use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fixture_cache::FixtureSource;
use crate::league_cache::{League, LeagueSource};
use crate::normalize::{pick_id, pick_string};

const API_BASE: &str = "https://v3.football.api-sports.io";
const API_HOST: &str = "v3.football.api-sports.io";
const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

pub fn has_api_key() -> bool {
    std::env::var("FOOTBALL_API_KEY").is_ok_and(|k| !k.trim().is_empty())
}

fn api_key() -> Result<String> {
    let key = std::env::var("FOOTBALL_API_KEY").unwrap_or_default();
    if key.trim().is_empty() {
        return Err(anyhow::anyhow!("FOOTBALL_API_KEY missing"));
    }
    Ok(key)
}

fn get_json(path: &str, params: &[(&str, String)]) -> Result<Value> {
    let client = http_client()?;
    let key = api_key()?;
    let resp = client
        .get(format!("{API_BASE}{path}"))
        .query(params)
        .header("x-rapidapi-host", API_HOST)
        .header("x-rapidapi-key", key)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    serde_json::from_str(&body).context("invalid api json")
}

fn response_rows(data: &Value) -> Vec<Value> {
    data.get("response")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Statistic values arrive as numbers, percent strings, plain numeric
/// strings, or junk. "68%" -> 68.0, "1.39" -> 1.39, 7 -> 7.0, else None.
pub fn parse_stat_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(raw) => {
            let s = raw.trim();
            if let Some(stripped) = s.strip_suffix('%') {
                if is_plain_decimal(stripped) {
                    return stripped.parse().ok();
                }
                return None;
            }
            let unsigned = s.strip_prefix('-').unwrap_or(s);
            if is_plain_decimal(unsigned) {
                return s.parse().ok();
            }
            None
        }
        _ => None,
    }
}

// Digits, optionally a dot with digits after it. Nothing else.
fn is_plain_decimal(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(f) => !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

/* =========================
   Leagues (current)
   ========================= */

pub fn fetch_current_leagues() -> Result<Vec<League>> {
    let data = get_json("/leagues", &[("current", "true".to_string())])?;
    Ok(leagues_from_response(&data))
}

pub fn parse_leagues_json(raw: &str) -> Result<Vec<League>> {
    let data: Value = serde_json::from_str(raw).context("invalid leagues json")?;
    Ok(leagues_from_response(&data))
}

/// De-dupes by league id; the first occurrence per id wins.
fn leagues_from_response(data: &Value) -> Vec<League> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in response_rows(data) {
        let Some(league) = item.get("league") else {
            continue;
        };
        let Some(id) = pick_id(league, &["id"]) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }
        let season = item
            .get("seasons")
            .and_then(|v| v.as_array())
            .and_then(|seasons| {
                seasons
                    .iter()
                    .find(|s| s.get("current").and_then(|c| c.as_bool()).unwrap_or(false))
            })
            .and_then(|s| s.get("year"))
            .and_then(|y| y.as_i64())
            .map(|y| y as i32);
        out.push(League {
            id,
            name: pick_string(league, &["name"]).unwrap_or_else(|| "Unknown".to_string()),
            kind: pick_string(league, &["type"]).unwrap_or_default(),
            logo: pick_string(league, &["logo"]).unwrap_or_default(),
            country: item
                .get("country")
                .and_then(|c| pick_string(c, &["name"]))
                .unwrap_or_default(),
            season,
        });
    }
    out
}

/* =========================
   Teams by league + season
   ========================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: Option<String>,
    pub name: String,
    pub code: String,
    pub country: String,
    pub logo: String,
}

pub fn fetch_teams(league_id: &str, season: i32) -> Result<Vec<TeamInfo>> {
    let data = get_json(
        "/teams",
        &[
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ],
    )?;
    Ok(teams_from_response(&data))
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamInfo>> {
    let data: Value = serde_json::from_str(raw).context("invalid teams json")?;
    Ok(teams_from_response(&data))
}

fn teams_from_response(data: &Value) -> Vec<TeamInfo> {
    response_rows(data)
        .iter()
        .filter_map(|row| row.get("team"))
        .map(|team| TeamInfo {
            id: pick_id(team, &["id"]),
            name: pick_string(team, &["name"]).unwrap_or_default(),
            code: pick_string(team, &["code"]).unwrap_or_default(),
            country: pick_string(team, &["country"]).unwrap_or_default(),
            logo: pick_string(team, &["logo"]).unwrap_or_default(),
        })
        .collect()
}

/* =========================
   Fixtures
   ========================= */

/// Next `count` fixtures for a league, as raw API rows. Callers normalize
/// through `normalize::normalize_fixture`.
pub fn fetch_next_fixtures(league_id: &str, count: usize) -> Result<Vec<Value>> {
    let data = get_json(
        "/fixtures",
        &[
            ("league", league_id.to_string()),
            ("next", count.to_string()),
        ],
    )?;
    Ok(response_rows(&data))
}

pub fn fetch_fixture_by_id(fixture_id: &str) -> Result<Option<Value>> {
    let data = get_json("/fixtures", &[("id", fixture_id.to_string())])?;
    Ok(response_rows(&data).into_iter().next())
}

/// Last `last` finished head-to-head fixtures between two teams.
pub fn fetch_head_to_head(home_id: &str, away_id: &str, last: usize) -> Result<Vec<Value>> {
    let data = get_json(
        "/fixtures/headtohead",
        &[
            ("h2h", format!("{home_id}-{away_id}")),
            ("status", "ft".to_string()),
            ("last", last.to_string()),
        ],
    )?;
    Ok(response_rows(&data))
}

/* =========================
   Statistics
   ========================= */

pub fn fetch_team_season_stats(
    league_id: &str,
    team_id: &str,
    season: i32,
) -> Result<Option<Value>> {
    let data = get_json(
        "/teams/statistics",
        &[
            ("league", league_id.to_string()),
            ("team", team_id.to_string()),
            ("season", season.to_string()),
        ],
    )?;
    let response = data.get("response").cloned().unwrap_or(Value::Null);
    if response.is_null() {
        return Ok(None);
    }
    Ok(Some(response))
}

/// One team's parsed statistics for a single fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamFixtureStats {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub stats: HashMap<String, Option<f64>>,
}

/// Per-fixture statistics keyed by team id.
pub type FixtureStatistics = HashMap<String, TeamFixtureStats>;

pub fn fetch_fixture_statistics(fixture_id: &str) -> Result<FixtureStatistics> {
    let data = get_json("/fixtures/statistics", &[("fixture", fixture_id.to_string())])?;
    Ok(fixture_statistics_from_response(&data))
}

pub fn parse_fixture_statistics_json(raw: &str) -> Result<FixtureStatistics> {
    let data: Value = serde_json::from_str(raw).context("invalid fixture statistics json")?;
    Ok(fixture_statistics_from_response(&data))
}

fn fixture_statistics_from_response(data: &Value) -> FixtureStatistics {
    let mut teams = HashMap::new();
    for row in response_rows(data) {
        let Some(team) = row.get("team") else {
            continue;
        };
        let Some(tid) = pick_id(team, &["id"]) else {
            continue;
        };
        let mut stats = HashMap::new();
        if let Some(list) = row.get("statistics").and_then(|v| v.as_array()) {
            for entry in list {
                let Some(name) = pick_string(entry, &["type"]) else {
                    continue;
                };
                let value = entry.get("value").map(parse_stat_value).unwrap_or(None);
                stats.insert(name, value);
            }
        }
        teams.insert(
            tid.clone(),
            TeamFixtureStats {
                id: tid,
                name: pick_string(team, &["name"]).unwrap_or_default(),
                logo: pick_string(team, &["logo"]).unwrap_or_default(),
                stats,
            },
        );
    }
    teams
}

/* =========================
   Live source wiring
   ========================= */

/// The live data source handed to the cache layer and provider thread.
#[derive(Debug, Clone, Copy)]
pub struct LiveApi;

impl FixtureSource for LiveApi {
    fn next_fixtures(&self, league_id: &str, count: usize) -> Result<Vec<Value>> {
        fetch_next_fixtures(league_id, count)
    }
}

impl LeagueSource for LiveApi {
    fn current_leagues(&self) -> Result<Vec<League>> {
        fetch_current_leagues()
    }
}
