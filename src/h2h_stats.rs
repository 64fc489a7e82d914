use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::football_api::FixtureStatistics;
use crate::normalize::Fixture;

/// Statistics tracked on the match page, in display order.
pub const KEY_STATS: &[&str] = &[
    "Shots on Goal",
    "Shots off Goal",
    "Total Shots",
    "Shots insidebox",
    "Shots outsidebox",
    "Fouls",
    "Corner Kicks",
    "Offsides",
    "Yellow Cards",
    "Red Cards",
    "Goalkeeper Saves",
    "Ball Possession",
    "expected_goals",
];

pub const RED_CARDS: &str = "Red Cards";

fn is_percentage_stat(name: &str) -> bool {
    name == "Ball Possession"
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideAverage {
    pub home: f64,
    pub away: f64,
}

/// One head-to-head fixture's contribution to a statistic, in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub fixture_id: Option<String>,
    pub date: Option<String>,
    pub home_value: f64,
    pub away_value: f64,
    pub home_name: String,
    pub away_name: String,
    pub home_logo: String,
    pub away_logo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedCardSide {
    pub name: String,
    pub logo: String,
    pub count: f64,
}

/// A historical match where at least one side picked up a red card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedCardEvent {
    pub fixture_id: Option<String>,
    pub date: Option<String>,
    pub home: RedCardSide,
    pub away: RedCardSide,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct H2hAggregate {
    pub averages: HashMap<String, SideAverage>,
    pub series: HashMap<String, Vec<SeriesPoint>>,
    pub red_card_events: Vec<RedCardEvent>,
}

#[derive(Default)]
struct RunningSum {
    sum: f64,
    count: usize,
}

impl RunningSum {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        // Zero-sample stats average to 0 rather than NaN.
        self.sum / self.count.max(1) as f64
    }
}

/// Aggregates head-to-head history into per-stat home/away averages, a
/// per-stat series, and the red-card match list.
///
/// `bundles` parallels `h2h`; `None` marks a statistics fetch that failed,
/// and that fixture is skipped outright instead of zero-filled. A present
/// bundle with a missing team or missing value contributes 0 and still
/// counts toward the denominator.
pub fn aggregate_h2h(
    h2h: &[Fixture],
    bundles: &[Option<FixtureStatistics>],
    home_id: &str,
    away_id: &str,
    tracked: &[&str],
) -> H2hAggregate {
    let mut acc: HashMap<&str, (RunningSum, RunningSum)> = HashMap::new();
    let mut series: HashMap<String, Vec<SeriesPoint>> = HashMap::new();
    let mut red_card_events = Vec::new();

    for (fixture, bundle) in h2h.iter().zip(bundles) {
        let Some(stats_by_team) = bundle else {
            continue;
        };
        let home_stats = stats_by_team.get(home_id).map(|t| &t.stats);
        let away_stats = stats_by_team.get(away_id).map(|t| &t.stats);

        for name in tracked {
            let home_value = stat_or_zero(home_stats, name);
            let away_value = stat_or_zero(away_stats, name);

            let (home_acc, away_acc) = acc.entry(name).or_default();
            home_acc.push(home_value);
            away_acc.push(away_value);

            series
                .entry(name.to_string())
                .or_default()
                .push(SeriesPoint {
                    fixture_id: fixture.id.clone(),
                    date: fixture.date.clone(),
                    home_value,
                    away_value,
                    home_name: fixture.home.name.clone(),
                    away_name: fixture.away.name.clone(),
                    home_logo: fixture.home.logo.clone(),
                    away_logo: fixture.away.logo.clone(),
                });
        }

        let home_rc = stat_or_zero(home_stats, RED_CARDS);
        let away_rc = stat_or_zero(away_stats, RED_CARDS);
        if home_rc > 0.0 || away_rc > 0.0 {
            red_card_events.push(RedCardEvent {
                fixture_id: fixture.id.clone(),
                date: fixture.date.clone(),
                home: RedCardSide {
                    name: fixture.home.name.clone(),
                    logo: fixture.home.logo.clone(),
                    count: home_rc,
                },
                away: RedCardSide {
                    name: fixture.away.name.clone(),
                    logo: fixture.away.logo.clone(),
                    count: away_rc,
                },
            });
        }
    }

    let mut averages = HashMap::new();
    for name in tracked {
        let decimals = if is_percentage_stat(name) { 1 } else { 2 };
        let (home_acc, away_acc) = acc.entry(name).or_default();
        averages.insert(
            name.to_string(),
            SideAverage {
                home: round_to(home_acc.average(), decimals),
                away: round_to(away_acc.average(), decimals),
            },
        );
    }

    H2hAggregate {
        averages,
        series,
        red_card_events,
    }
}

fn stat_or_zero(stats: Option<&HashMap<String, Option<f64>>>, name: &str) -> f64 {
    stats
        .and_then(|s| s.get(name).copied().flatten())
        .unwrap_or(0.0)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
