//! Delta evaluation between fresh leaderboard observations and the stored snapshot.
//!
//! Everything in this module is pure: it takes observations and the prior snapshot and
//! returns alerts plus the snapshot entries to commit. The poll service decides whether
//! the alerts are sent and when the new snapshot is written.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::model::{
    alert::{AlertEvent, AlertKind},
    leaderboard::LeaderboardRow,
    metric::{self, Metric, MetricId},
    snapshot::{EntitySnapshot, LeaderKey},
    tracked::{EntityKind, EntityRef, TrackedEntity},
    history::HistoryPoint,
};

/// Values of one entity merged across every table fetched in a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub display_name: String,
    /// Clan reported by a player table row.
    pub clan_name: Option<String>,
    pub values: BTreeMap<MetricId, f64>,
    /// Rank of the entity in the table sorted by each metric.
    pub ranks: BTreeMap<MetricId, i64>,
}

impl Observation {
    /// Merges every numeric stat of a row into the observation.
    ///
    /// # Arguments
    /// - `group` - API group of the table the row came from
    /// - `sort_by` - Column the table was sorted by; the row's rank applies to it
    /// - `row` - Leaderboard row
    pub fn absorb(&mut self, group: &str, sort_by: &str, row: &LeaderboardRow) {
        for (stat, value) in &row.stats {
            self.values.insert(MetricId::new(group, stat.as_str()), *value);
        }
        if let Some(rank) = row.rank {
            self.ranks.insert(MetricId::new(group, sort_by), rank);
        }
        if self.clan_name.is_none() {
            self.clan_name = row.clan_name.clone();
        }
    }
}

/// Alert threshold applied to watched metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaRule {
    /// Smallest absolute change that produces an alert.
    pub min_delta: f64,
}

impl Default for DeltaRule {
    fn default() -> Self {
        Self { min_delta: 1.0 }
    }
}

/// Result of evaluating tracked entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub alerts: Vec<AlertEvent>,
    /// Snapshot entries for every tracked entity that has one.
    pub entities: BTreeMap<EntityRef, EntitySnapshot>,
}

/// Compares observations of tracked entities against their prior snapshot.
///
/// Only catalog counters the tracker watches are diffed; ratio columns such as `kdr`
/// are dropped. Entities without a prior snapshot and metrics seen for the first time
/// only store a baseline. A decrease of a watched counter means the wipe reset it, which
/// yields a single `RoundEnded` alert and replaces the entity's baseline. Entities
/// missing from this cycle's tables keep their last snapshot, and stats the tracker no
/// longer watches are dropped from it.
///
/// # Arguments
/// - `observations` - Fresh values keyed by entity
/// - `prior` - Snapshot entries from the previous cycle
/// - `tracked` - Current trackers; only these are evaluated and kept
/// - `rule` - Minimum delta for an alert
/// - `now` - Observation time
///
/// # Returns
/// - `Evaluation` - Alerts in entity order and the snapshot entries to commit
pub fn evaluate(
    observations: &BTreeMap<EntityRef, Observation>,
    prior: &BTreeMap<EntityRef, EntitySnapshot>,
    tracked: &BTreeMap<EntityRef, TrackedEntity>,
    rule: &DeltaRule,
    now: DateTime<Utc>,
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for (entity, tracker) in tracked {
        let previous = prior.get(entity);

        let Some(observation) = observations.get(entity) else {
            if let Some(previous) = previous {
                evaluation.entities.insert(entity.clone(), previous.clone());
            }
            continue;
        };

        let watched: BTreeMap<MetricId, f64> = observation
            .values
            .iter()
            .filter(|(id, _)| tracker.watches(&id.stat) && metric::is_counter(id))
            .map(|(id, value)| (id.clone(), *value))
            .collect();

        let Some(previous) = previous else {
            evaluation.entities.insert(
                entity.clone(),
                EntitySnapshot {
                    values: watched,
                    observed_at: now,
                },
            );
            continue;
        };

        let clan_label = tracker
            .clan_label
            .clone()
            .or_else(|| observation.clan_name.clone());
        let alert = |kind: AlertKind, metric: &MetricId, old: f64, new: f64| AlertEvent {
            kind,
            entity: entity.clone(),
            display_name: observation.display_name.clone(),
            clan_label: clan_label.clone(),
            metric: metric.clone(),
            old_value: old,
            new_value: new,
            delta: new - old,
            rank: observation.ranks.get(metric).copied(),
            observed_at: now,
        };

        let reset = watched.iter().find_map(|(id, new)| {
            previous
                .values
                .get(id)
                .filter(|old| new < *old)
                .map(|old| (id, *old, *new))
        });

        if let Some((id, old, new)) = reset {
            tracing::info!(
                "{} {} counters went backwards ({} {} -> {}), re-baselining",
                entity.kind,
                observation.display_name,
                id,
                old,
                new
            );
            evaluation.alerts.push(alert(AlertKind::RoundEnded, id, old, new));
            evaluation.entities.insert(
                entity.clone(),
                EntitySnapshot {
                    values: watched,
                    observed_at: now,
                },
            );
            continue;
        }

        let mut values: BTreeMap<MetricId, f64> = previous
            .values
            .iter()
            .filter(|(id, _)| tracker.watches(&id.stat) && metric::is_counter(id))
            .map(|(id, value)| (id.clone(), *value))
            .collect();
        for (id, new) in watched {
            if let Some(old) = previous.values.get(&id).copied() {
                let delta = new - old;
                if delta >= rule.min_delta {
                    evaluation.alerts.push(alert(AlertKind::Increase, &id, old, new));
                }
            }
            values.insert(id, new);
        }

        evaluation.entities.insert(
            entity.clone(),
            EntitySnapshot {
                values,
                observed_at: now,
            },
        );
    }

    evaluation
}

/// Result of checking the top clans of one metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderEvaluation {
    pub alerts: Vec<AlertEvent>,
    /// New leader values for metrics with a spike threshold.
    pub leaders: BTreeMap<LeaderKey, f64>,
    /// Rows to append to the metric history.
    pub history: Vec<HistoryPoint>,
}

/// Records the top clans of a metric and flags spikes.
///
/// Only the first `TREND_TOP_N` rows are considered. A spike is an increase of at least
/// the metric's threshold since the clan's previous leader value. The bot's own clan
/// never produces a spike alert.
///
/// # Arguments
/// - `metric` - Catalog metric the table was sorted by
/// - `rows` - Clan table rows in rank order
/// - `prior` - Leader values from the previous cycle
/// - `own_clan` - Configured clan name, compared case-insensitively
/// - `now` - Observation time
pub fn evaluate_leaders(
    metric: &Metric,
    rows: &[LeaderboardRow],
    prior: &BTreeMap<LeaderKey, f64>,
    own_clan: &str,
    now: DateTime<Utc>,
) -> LeaderEvaluation {
    let mut evaluation = LeaderEvaluation::default();
    let threshold = metric::spike_threshold(metric.key);

    for row in rows.iter().take(metric::TREND_TOP_N) {
        let Some(clan) = row.clan_name.as_deref() else {
            continue;
        };
        let Some(value) = row.stat(metric.sort_by) else {
            continue;
        };

        if metric::records_history(metric.key) {
            evaluation.history.push(HistoryPoint {
                metric_key: metric.key.to_string(),
                clan_name: clan.to_string(),
                rank: row.rank,
                value,
                recorded_at: now,
            });
        }

        let Some(threshold) = threshold else {
            continue;
        };

        let key = (metric.key.to_string(), clan.to_string());
        let previous = prior.get(&key).copied();
        evaluation.leaders.insert(key, value);

        let Some(previous) = previous else {
            continue;
        };
        let delta = value - previous;
        if delta < threshold || clan.eq_ignore_ascii_case(own_clan) {
            continue;
        }

        evaluation.alerts.push(AlertEvent {
            kind: AlertKind::Spike,
            entity: EntityRef::clan(clan),
            display_name: clan.to_string(),
            clan_label: None,
            metric: metric.id(),
            old_value: previous,
            new_value: value,
            delta,
            rank: row.rank,
            observed_at: now,
        });
    }

    evaluation
}

/// Builds observations for tracked entities from one fetched table.
///
/// # Arguments
/// - `observations` - Accumulator for the whole cycle
/// - `tracked` - Current trackers
/// - `kind` - Whether the table lists clans or players
/// - `group` - API group of the table
/// - `sort_by` - Sort column of the table
/// - `rows` - Table rows
pub fn collect_observations(
    observations: &mut BTreeMap<EntityRef, Observation>,
    tracked: &BTreeMap<EntityRef, TrackedEntity>,
    kind: EntityKind,
    group: &str,
    sort_by: &str,
    rows: &[LeaderboardRow],
) {
    for row in rows {
        let (entity, name) = match kind {
            EntityKind::Clan => match row.clan_name.as_deref() {
                Some(name) => (EntityRef::clan(name), name.to_string()),
                None => continue,
            },
            EntityKind::Player => match row.steam_id.as_deref() {
                Some(steam) => (
                    EntityRef::player(steam),
                    row.username.clone().unwrap_or_else(|| steam.to_string()),
                ),
                None => continue,
            },
        };

        if !tracked.contains_key(&entity) {
            continue;
        }

        observations
            .entry(entity)
            .or_insert_with(|| Observation {
                display_name: name,
                ..Default::default()
            })
            .absorb(group, sort_by, row);
    }
}
