use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One side of a fixture in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

/// Canonical fixture shape shared by the live API path and the cache path.
/// Two fixtures with the same `Some` id are the same fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: Option<String>,
    pub date: Option<String>,
    pub home: TeamRef,
    pub away: TeamRef,
}

/// Maps any of the known fixture-shaped records into the canonical form.
/// Per attribute the lookup order is: canonical field, nested API shape,
/// flat alias. Never fails; unresolved fields become None/empty.
pub fn normalize_fixture(raw: &Value) -> Fixture {
    Fixture {
        id: pick_id(raw, &["id"])
            .or_else(|| pick_id_path(raw, "fixture", "id"))
            .or_else(|| pick_id(raw, &["fixtureId"])),
        date: pick_string(raw, &["date"]).or_else(|| pick_string_path(raw, "fixture", "date")),
        home: normalize_side(raw, "home", "homeId", "homeName", "homeLogo"),
        away: normalize_side(raw, "away", "awayId", "awayName", "awayLogo"),
    }
}

fn normalize_side(
    raw: &Value,
    side: &str,
    flat_id: &str,
    flat_name: &str,
    flat_logo: &str,
) -> TeamRef {
    let canonical = raw.get(side);
    let nested = raw.get("teams").and_then(|t| t.get(side));
    TeamRef {
        id: canonical
            .and_then(|v| pick_id(v, &["id"]))
            .or_else(|| nested.and_then(|v| pick_id(v, &["id"])))
            .or_else(|| pick_id(raw, &[flat_id])),
        name: canonical
            .and_then(|v| pick_string(v, &["name"]))
            .or_else(|| nested.and_then(|v| pick_string(v, &["name"])))
            .or_else(|| pick_string(raw, &[flat_name]))
            .unwrap_or_default(),
        logo: canonical
            .and_then(|v| pick_string(v, &["logo"]))
            .or_else(|| nested.and_then(|v| pick_string(v, &["logo"])))
            .or_else(|| pick_string(raw, &[flat_logo]))
            .unwrap_or_default(),
    }
}

/// Kickoff instant in unix millis, when the date parses as RFC3339.
pub fn kickoff_ms(fixture: &Fixture) -> Option<i64> {
    let date = fixture.date.as_deref()?;
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|d| d.timestamp_millis())
}

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_string_path(value: &Value, outer: &str, inner: &str) -> Option<String> {
    value.get(outer).and_then(|v| pick_string(v, &[inner]))
}

/// Identifier lookup: numbers stringify so "39" and 39 compare equal.
pub fn pick_id(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_id_path(value: &Value, outer: &str, inner: &str) -> Option<String> {
    value.get(outer).and_then(|v| pick_id(v, &[inner]))
}
