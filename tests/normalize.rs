use matchday_terminal::normalize::{kickoff_ms, normalize_fixture};
use serde_json::json;

#[test]
fn canonical_shape_passes_through() {
    let raw = json!({
        "id": "42",
        "date": "2030-06-01T18:00:00Z",
        "home": { "id": "10", "name": "Alpha", "logo": "a.png" },
        "away": { "id": "20", "name": "Beta", "logo": "b.png" },
    });
    let fixture = normalize_fixture(&raw);
    assert_eq!(fixture.id.as_deref(), Some("42"));
    assert_eq!(fixture.date.as_deref(), Some("2030-06-01T18:00:00Z"));
    assert_eq!(fixture.home.id.as_deref(), Some("10"));
    assert_eq!(fixture.home.name, "Alpha");
    assert_eq!(fixture.away.logo, "b.png");
}

#[test]
fn nested_api_shape_resolves() {
    let raw = json!({
        "fixture": { "id": 868_549, "date": "2030-06-01T18:00:00Z" },
        "teams": {
            "home": { "id": 10, "name": "Alpha", "logo": "a.png" },
            "away": { "id": 20, "name": "Beta", "logo": "b.png" },
        },
    });
    let fixture = normalize_fixture(&raw);
    assert_eq!(fixture.id.as_deref(), Some("868549"));
    assert_eq!(fixture.date.as_deref(), Some("2030-06-01T18:00:00Z"));
    assert_eq!(fixture.home.id.as_deref(), Some("10"));
    assert_eq!(fixture.away.name, "Beta");
}

#[test]
fn flat_alias_shape_resolves() {
    let raw = json!({
        "fixtureId": "77",
        "date": "2030-06-01T18:00:00Z",
        "homeId": 10,
        "homeName": "Alpha",
        "homeLogo": "a.png",
        "awayId": 20,
        "awayName": "Beta",
        "awayLogo": "b.png",
    });
    let fixture = normalize_fixture(&raw);
    assert_eq!(fixture.id.as_deref(), Some("77"));
    assert_eq!(fixture.home.id.as_deref(), Some("10"));
    assert_eq!(fixture.home.logo, "a.png");
    assert_eq!(fixture.away.name, "Beta");
}

#[test]
fn canonical_field_wins_over_nested_and_flat() {
    let raw = json!({
        "id": "top",
        "fixture": { "id": "nested" },
        "fixtureId": "flat",
        "home": { "name": "Canonical" },
        "teams": { "home": { "name": "Nested" } },
        "homeName": "Flat",
    });
    let fixture = normalize_fixture(&raw);
    assert_eq!(fixture.id.as_deref(), Some("top"));
    assert_eq!(fixture.home.name, "Canonical");
}

#[test]
fn junk_input_still_yields_a_fixture() {
    let fixture = normalize_fixture(&json!({ "unrelated": true }));
    assert!(fixture.id.is_none());
    assert!(fixture.date.is_none());
    assert!(fixture.home.id.is_none());
    assert!(fixture.home.name.is_empty());
    assert!(kickoff_ms(&fixture).is_none());
}

#[test]
fn empty_string_id_is_skipped() {
    let raw = json!({ "id": "", "fixture": { "id": 5 } });
    let fixture = normalize_fixture(&raw);
    assert_eq!(fixture.id.as_deref(), Some("5"));
}

#[test]
fn kickoff_parses_rfc3339() {
    let fixture = normalize_fixture(&json!({
        "id": "1",
        "date": "1970-01-01T00:00:10Z",
    }));
    assert_eq!(kickoff_ms(&fixture), Some(10_000));

    let bad = normalize_fixture(&json!({ "id": "1", "date": "next tuesday" }));
    assert!(kickoff_ms(&bad).is_none());
}
