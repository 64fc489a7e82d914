use std::collections::HashMap;

use matchday_terminal::football_api::{FixtureStatistics, TeamFixtureStats};
use matchday_terminal::h2h_stats::aggregate_h2h;
use matchday_terminal::normalize::{Fixture, TeamRef};

const HOME: &str = "10";
const AWAY: &str = "20";

fn team(id: &str, name: &str) -> TeamRef {
    TeamRef {
        id: Some(id.to_string()),
        name: name.to_string(),
        logo: format!("{name}.png"),
    }
}

fn fixture(id: &str, date: &str) -> Fixture {
    Fixture {
        id: Some(id.to_string()),
        date: Some(date.to_string()),
        home: team(HOME, "Alpha"),
        away: team(AWAY, "Beta"),
    }
}

fn side(id: &str, name: &str, stats: &[(&str, Option<f64>)]) -> TeamFixtureStats {
    TeamFixtureStats {
        id: id.to_string(),
        name: name.to_string(),
        logo: String::new(),
        stats: stats
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<HashMap<_, _>>(),
    }
}

fn bundle(home: &[(&str, Option<f64>)], away: &[(&str, Option<f64>)]) -> FixtureStatistics {
    let mut out = FixtureStatistics::new();
    out.insert(HOME.to_string(), side(HOME, "Alpha", home));
    out.insert(AWAY.to_string(), side(AWAY, "Beta", away));
    out
}

#[test]
fn null_values_count_as_zero_toward_the_average() {
    let h2h = vec![
        fixture("1", "2024-01-01T15:00:00Z"),
        fixture("2", "2024-06-01T15:00:00Z"),
        fixture("3", "2025-01-01T15:00:00Z"),
    ];
    let bundles = vec![
        Some(bundle(&[("Fouls", Some(5.0))], &[("Fouls", Some(10.0))])),
        Some(bundle(&[("Fouls", None)], &[("Fouls", Some(8.0))])),
        Some(bundle(&[("Fouls", Some(7.0))], &[("Fouls", Some(12.0))])),
    ];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Fouls"]);
    let avg = agg.averages.get("Fouls").expect("fouls average");
    assert_eq!(avg.home, 4.0);
    assert_eq!(avg.away, 10.0);
}

#[test]
fn failed_bundle_is_skipped_not_zero_filled() {
    let h2h = vec![
        fixture("1", "2024-01-01T15:00:00Z"),
        fixture("2", "2024-06-01T15:00:00Z"),
        fixture("3", "2025-01-01T15:00:00Z"),
    ];
    let bundles = vec![
        Some(bundle(&[("Fouls", Some(5.0))], &[("Fouls", Some(4.0))])),
        None,
        Some(bundle(&[("Fouls", Some(7.0))], &[("Fouls", Some(6.0))])),
    ];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Fouls"]);
    let avg = agg.averages.get("Fouls").expect("fouls average");
    assert_eq!(avg.home, 6.0);
    assert_eq!(avg.away, 5.0);
    // The skipped fixture contributes no series point either.
    assert_eq!(agg.series.get("Fouls").map(|s| s.len()), Some(2));
}

#[test]
fn missing_team_entry_reads_as_zero() {
    let h2h = vec![fixture("1", "2024-01-01T15:00:00Z")];
    let mut only_away = FixtureStatistics::new();
    only_away.insert(
        AWAY.to_string(),
        side(AWAY, "Beta", &[("Fouls", Some(9.0))]),
    );
    let bundles = vec![Some(only_away)];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Fouls"]);
    let avg = agg.averages.get("Fouls").expect("fouls average");
    assert_eq!(avg.home, 0.0);
    assert_eq!(avg.away, 9.0);
}

#[test]
fn possession_rounds_to_one_decimal_others_to_two() {
    let h2h = vec![
        fixture("1", "2024-01-01T15:00:00Z"),
        fixture("2", "2024-06-01T15:00:00Z"),
        fixture("3", "2025-01-01T15:00:00Z"),
    ];
    let stats: Vec<(&str, Option<f64>)> = vec![
        ("Ball Possession", Some(55.0)),
        ("expected_goals", Some(1.0)),
    ];
    let other: Vec<(&str, Option<f64>)> = vec![
        ("Ball Possession", Some(45.0)),
        ("expected_goals", Some(1.1)),
    ];
    let third: Vec<(&str, Option<f64>)> = vec![
        ("Ball Possession", Some(50.0)),
        ("expected_goals", Some(1.0)),
    ];
    let bundles = vec![
        Some(bundle(&stats, &stats)),
        Some(bundle(&other, &other)),
        Some(bundle(&third, &third)),
    ];

    let agg = aggregate_h2h(
        &h2h,
        &bundles,
        HOME,
        AWAY,
        &["Ball Possession", "expected_goals"],
    );
    // 150 / 3 = 50.0 exactly; 3.1 / 3 = 1.0333... -> 1.03.
    assert_eq!(agg.averages["Ball Possession"].home, 50.0);
    assert_eq!(agg.averages["expected_goals"].home, 1.03);
}

#[test]
fn zero_sample_average_is_zero_not_nan() {
    let agg = aggregate_h2h(&[], &[], HOME, AWAY, &["Fouls"]);
    let avg = agg.averages.get("Fouls").expect("fouls average");
    assert_eq!(avg.home, 0.0);
    assert_eq!(avg.away, 0.0);
}

#[test]
fn series_points_keep_fixture_order_and_identity() {
    let h2h = vec![
        fixture("1", "2024-01-01T15:00:00Z"),
        fixture("2", "2024-06-01T15:00:00Z"),
    ];
    let bundles = vec![
        Some(bundle(&[("Fouls", Some(3.0))], &[("Fouls", Some(4.0))])),
        Some(bundle(&[("Fouls", Some(5.0))], &[("Fouls", Some(6.0))])),
    ];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Fouls"]);
    let series = agg.series.get("Fouls").expect("fouls series");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].fixture_id.as_deref(), Some("1"));
    assert_eq!(series[0].home_value, 3.0);
    assert_eq!(series[0].home_name, "Alpha");
    assert_eq!(series[1].fixture_id.as_deref(), Some("2"));
    assert_eq!(series[1].away_value, 6.0);
}

#[test]
fn red_card_events_only_for_matches_with_a_card() {
    let h2h = vec![
        fixture("1", "2024-01-01T15:00:00Z"),
        fixture("2", "2024-03-01T15:00:00Z"),
        fixture("3", "2024-06-01T15:00:00Z"),
        fixture("4", "2024-09-01T15:00:00Z"),
    ];
    let bundles = vec![
        Some(bundle(
            &[("Red Cards", Some(0.0))],
            &[("Red Cards", Some(0.0))],
        )),
        Some(bundle(
            &[("Red Cards", Some(1.0))],
            &[("Red Cards", Some(0.0))],
        )),
        Some(bundle(&[("Red Cards", None)], &[("Red Cards", None)])),
        Some(bundle(
            &[("Red Cards", Some(0.0))],
            &[("Red Cards", Some(2.0))],
        )),
    ];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Red Cards"]);
    assert_eq!(agg.red_card_events.len(), 2);
    assert_eq!(agg.red_card_events[0].fixture_id.as_deref(), Some("2"));
    assert_eq!(agg.red_card_events[0].home.count, 1.0);
    assert_eq!(agg.red_card_events[0].home.name, "Alpha");
    assert_eq!(agg.red_card_events[1].fixture_id.as_deref(), Some("4"));
    assert_eq!(agg.red_card_events[1].away.count, 2.0);
}

#[test]
fn red_cards_tracked_even_when_not_in_tracked_list() {
    let h2h = vec![fixture("1", "2024-01-01T15:00:00Z")];
    let bundles = vec![Some(bundle(
        &[("Red Cards", Some(1.0)), ("Fouls", Some(3.0))],
        &[("Red Cards", Some(0.0)), ("Fouls", Some(2.0))],
    ))];

    let agg = aggregate_h2h(&h2h, &bundles, HOME, AWAY, &["Fouls"]);
    assert_eq!(agg.red_card_events.len(), 1);
    assert!(!agg.averages.contains_key("Red Cards"));
}
