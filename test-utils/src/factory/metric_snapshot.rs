use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating metric snapshot rows.
pub struct MetricSnapshotFactory<'a> {
    db: &'a DatabaseConnection,
    kind: String,
    identifier: String,
    group: String,
    stat: String,
    value: f64,
    observed_at: DateTime<Utc>,
}

impl<'a> MetricSnapshotFactory<'a> {
    /// Creates a factory for a clan `pvp/kill_player` value of zero observed now.
    pub fn new(db: &'a DatabaseConnection, identifier: impl Into<String>) -> Self {
        Self {
            db,
            kind: "clan".to_string(),
            identifier: identifier.into(),
            group: "pvp".to_string(),
            stat: "kill_player".to_string(),
            value: 0.0,
            observed_at: Utc::now(),
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn metric(mut self, group: impl Into<String>, stat: impl Into<String>) -> Self {
        self.group = group.into();
        self.stat = stat.into();
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }

    /// Builds and inserts the snapshot row.
    pub async fn build(self) -> Result<entity::metric_snapshot::Model, DbErr> {
        entity::metric_snapshot::ActiveModel {
            kind: ActiveValue::Set(self.kind),
            identifier: ActiveValue::Set(self.identifier),
            metric_group: ActiveValue::Set(self.group),
            stat: ActiveValue::Set(self.stat),
            value: ActiveValue::Set(self.value),
            observed_at: ActiveValue::Set(self.observed_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a clan snapshot row for one metric.
pub async fn create_metric_snapshot(
    db: &DatabaseConnection,
    identifier: &str,
    group: &str,
    stat: &str,
    value: f64,
) -> Result<entity::metric_snapshot::Model, DbErr> {
    MetricSnapshotFactory::new(db, identifier)
        .metric(group, stat)
        .value(value)
        .build()
        .await
}
