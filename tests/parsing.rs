use std::fs;
use std::path::PathBuf;

use matchday_terminal::football_api::{
    parse_fixture_statistics_json, parse_leagues_json, parse_stat_value, parse_teams_json,
};
use serde_json::json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn stat_values_parse_across_shapes() {
    assert_eq!(parse_stat_value(&json!(7)), Some(7.0));
    assert_eq!(parse_stat_value(&json!(1.39)), Some(1.39));
    assert_eq!(parse_stat_value(&json!("68%")), Some(68.0));
    assert_eq!(parse_stat_value(&json!("52.5%")), Some(52.5));
    assert_eq!(parse_stat_value(&json!("1.39")), Some(1.39));
    assert_eq!(parse_stat_value(&json!("-2")), Some(-2.0));
    assert_eq!(parse_stat_value(&json!(" 14 ")), Some(14.0));
    assert_eq!(parse_stat_value(&json!("")), None);
    assert_eq!(parse_stat_value(&json!("N/A")), None);
    assert_eq!(parse_stat_value(&json!("12%%")), None);
    assert_eq!(parse_stat_value(&json!("1.2.3")), None);
    assert_eq!(parse_stat_value(&json!(null)), None);
    assert_eq!(parse_stat_value(&json!(true)), None);
}

#[test]
fn parses_leagues_fixture() {
    let raw = read_fixture("leagues.json");
    let leagues = parse_leagues_json(&raw).expect("fixture should parse");

    // The payload carries a duplicate id 39; the first entry wins.
    assert_eq!(leagues.len(), 2);
    assert_eq!(leagues[0].id, "39");
    assert_eq!(leagues[0].name, "Premier League");
    assert_eq!(leagues[0].kind, "League");
    assert_eq!(leagues[0].country, "England");
    assert_eq!(leagues[0].season, Some(2025));
    assert_eq!(leagues[1].id, "2");
    assert_eq!(leagues[1].kind, "Cup");
}

#[test]
fn league_without_current_season_has_none() {
    let raw = json!({
        "response": [{
            "league": { "id": 99, "name": "Archived League", "type": "League" },
            "country": { "name": "Nowhere" },
            "seasons": [{ "year": 2010, "current": false }],
        }]
    })
    .to_string();
    let leagues = parse_leagues_json(&raw).expect("should parse");
    assert_eq!(leagues[0].season, None);
}

#[test]
fn leagues_null_is_empty() {
    assert!(parse_leagues_json("null").expect("null should parse").is_empty());
}

#[test]
fn parses_teams_fixture() {
    let raw = read_fixture("teams.json");
    let teams = parse_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].id.as_deref(), Some("50"));
    assert_eq!(teams[0].name, "Riverton FC");
    assert_eq!(teams[0].code, "RIV");
    assert_eq!(teams[1].country, "England");
}

#[test]
fn parses_fixture_statistics_fixture() {
    let raw = read_fixture("fixture_statistics.json");
    let stats = parse_fixture_statistics_json(&raw).expect("fixture should parse");
    assert_eq!(stats.len(), 2);

    let home = stats.get("10").expect("home team entry");
    assert_eq!(home.name, "Alpha");
    assert_eq!(home.stats.get("Ball Possession"), Some(&Some(68.0)));
    assert_eq!(home.stats.get("Total Shots"), Some(&Some(14.0)));
    assert_eq!(home.stats.get("expected_goals"), Some(&Some(1.39)));
    // Null values survive as explicit None entries.
    assert_eq!(home.stats.get("Passes accurate"), Some(&None));

    let away = stats.get("20").expect("away team entry");
    assert_eq!(away.stats.get("Ball Possession"), Some(&Some(32.0)));
}

#[test]
fn fixture_statistics_null_is_empty() {
    assert!(
        parse_fixture_statistics_json("null")
            .expect("null should parse")
            .is_empty()
    );
}
