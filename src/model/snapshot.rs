//! Last observed metric values.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::model::{metric::MetricId, tracked::EntityRef};

/// Last values seen for one tracked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub values: BTreeMap<MetricId, f64>,
    /// When the entity was last present in a fetched table.
    pub observed_at: DateTime<Utc>,
}

/// Key of a leader value: (metric key, clan name as shown on the leaderboard).
pub type LeaderKey = (String, String);

/// Everything the delta evaluator compares fresh tables against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub entities: BTreeMap<EntityRef, EntitySnapshot>,
    /// Last value per top clan of spike metrics.
    pub leaders: BTreeMap<LeaderKey, f64>,
    /// Time of the last successful poll cycle.
    pub taken_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn value(&self, entity: &EntityRef, metric: &MetricId) -> Option<f64> {
        self.entities
            .get(entity)
            .and_then(|snapshot| snapshot.values.get(metric))
            .copied()
    }
}
