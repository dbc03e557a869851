//! Top-clan history rows and the 12-hour trend computed from them.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One recorded value of a top clan for a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub metric_key: String,
    pub clan_name: String,
    pub rank: Option<i64>,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryPoint {
    pub fn from_entity(entity: entity::metric_history::Model) -> Self {
        Self {
            metric_key: entity.metric_key,
            clan_name: entity.clan_name,
            rank: entity.rank.map(i64::from),
            value: entity.value,
            recorded_at: entity.recorded_at,
        }
    }
}

/// Change of one clan over the trend window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub clan_name: String,
    /// Rank at the latest point in the window.
    pub rank: Option<i64>,
    pub start: f64,
    pub end: f64,
    pub delta: f64,
}

/// Computes per-clan change between the earliest and latest point of each clan.
///
/// # Arguments
/// - `points` - History rows of a single metric inside the trend window, any order
///
/// # Returns
/// - `Vec<TrendRow>` - One row per clan, largest gain first
pub fn compute_trend(points: &[HistoryPoint]) -> Vec<TrendRow> {
    let mut by_clan: BTreeMap<&str, (&HistoryPoint, &HistoryPoint)> = BTreeMap::new();

    for point in points {
        by_clan
            .entry(point.clan_name.as_str())
            .and_modify(|(first, last)| {
                if point.recorded_at < first.recorded_at {
                    *first = point;
                }
                if point.recorded_at >= last.recorded_at {
                    *last = point;
                }
            })
            .or_insert((point, point));
    }

    let mut rows: Vec<TrendRow> = by_clan
        .into_iter()
        .map(|(clan, (first, last))| TrendRow {
            clan_name: clan.to_string(),
            rank: last.rank,
            start: first.value,
            end: last.value,
            delta: last.value - first.value,
        })
        .collect();

    rows.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    rows
}
