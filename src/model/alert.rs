//! Alert events produced by a poll cycle.

use chrono::{DateTime, Utc};

use crate::model::{metric::MetricId, tracked::EntityRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// A watched metric grew.
    Increase,
    /// Counters of the entity went backwards, so the wipe rolled over.
    RoundEnded,
    /// A top clan gained at least the spike threshold of a metric in one cycle.
    Spike,
}

/// One change worth telling the channel about.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub entity: EntityRef,
    pub display_name: String,
    pub clan_label: Option<String>,
    pub metric: MetricId,
    pub old_value: f64,
    pub new_value: f64,
    pub delta: f64,
    pub rank: Option<i64>,
    pub observed_at: DateTime<Utc>,
}
