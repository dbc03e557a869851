//! Snapshot repository for per-entity metric values and top-clan leader values.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};
use std::collections::BTreeMap;

use crate::{
    error::AppError,
    model::{
        metric::MetricId,
        snapshot::{EntitySnapshot, LeaderKey},
        tracked::{EntityKind, EntityRef},
    },
};

pub struct SnapshotRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SnapshotRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Loads the last values of every entity.
    ///
    /// Rows are grouped by (kind, identifier); an entity's observation time is the latest
    /// `observed_at` among its rows.
    ///
    /// # Returns
    /// - `Ok(BTreeMap<EntityRef, EntitySnapshot>)` - Snapshot per entity
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr)` - A stored row has an unknown kind
    pub async fn load_entities(&self) -> Result<BTreeMap<EntityRef, EntitySnapshot>, AppError> {
        let rows = entity::prelude::MetricSnapshot::find().all(self.db).await?;

        let mut entities: BTreeMap<EntityRef, EntitySnapshot> = BTreeMap::new();
        for row in rows {
            let entity = EntityRef {
                kind: EntityKind::parse(&row.kind)?,
                identifier: row.identifier,
            };
            let snapshot = entities.entry(entity).or_insert_with(|| EntitySnapshot {
                values: BTreeMap::new(),
                observed_at: row.observed_at,
            });
            snapshot
                .values
                .insert(MetricId::new(row.metric_group, row.stat), row.value);
            if row.observed_at > snapshot.observed_at {
                snapshot.observed_at = row.observed_at;
            }
        }

        Ok(entities)
    }

    /// Replaces every stored entity value.
    ///
    /// # Arguments
    /// - `entities` - Snapshot per entity
    ///
    /// # Returns
    /// - `Ok(())` - Table now holds exactly the given values
    /// - `Err(DbErr)` - Database error during delete or insert
    pub async fn replace_entities(
        &self,
        entities: &BTreeMap<EntityRef, EntitySnapshot>,
    ) -> Result<(), DbErr> {
        entity::prelude::MetricSnapshot::delete_many()
            .exec(self.db)
            .await?;

        for (entity, snapshot) in entities {
            for (metric, value) in &snapshot.values {
                entity::metric_snapshot::ActiveModel {
                    kind: ActiveValue::Set(entity.kind.as_str().to_string()),
                    identifier: ActiveValue::Set(entity.identifier.clone()),
                    metric_group: ActiveValue::Set(metric.group.clone()),
                    stat: ActiveValue::Set(metric.stat.clone()),
                    value: ActiveValue::Set(*value),
                    observed_at: ActiveValue::Set(snapshot.observed_at),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Loads the last value of each top clan per spike metric.
    pub async fn load_leaders(&self) -> Result<BTreeMap<LeaderKey, f64>, DbErr> {
        let rows = entity::prelude::LeaderSnapshot::find().all(self.db).await?;

        Ok(rows
            .into_iter()
            .map(|row| ((row.metric_key, row.clan_name), row.value))
            .collect())
    }

    /// Replaces every stored leader value.
    ///
    /// # Arguments
    /// - `leaders` - Value per (metric key, clan name)
    /// - `observed_at` - Time of the cycle that produced the values
    pub async fn replace_leaders(
        &self,
        leaders: &BTreeMap<LeaderKey, f64>,
        observed_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::LeaderSnapshot::delete_many()
            .exec(self.db)
            .await?;

        for ((metric_key, clan_name), value) in leaders {
            entity::leader_snapshot::ActiveModel {
                metric_key: ActiveValue::Set(metric_key.clone()),
                clan_name: ActiveValue::Set(clan_name.clone()),
                value: ActiveValue::Set(*value),
                observed_at: ActiveValue::Set(observed_at),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }
}
