//! Metric history repository.
//!
//! Each poll cycle appends the top clans of every trend and spike metric. The trend embed
//! reads the last 12 hours back; rows older than the retention window are pruned.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::model::history::HistoryPoint;

pub struct HistoryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> HistoryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends history rows.
    ///
    /// # Arguments
    /// - `points` - Rows produced by one poll cycle
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of rows written
    /// - `Err(DbErr)` - Database error during insert
    pub async fn append(&self, points: &[HistoryPoint]) -> Result<usize, DbErr> {
        for point in points {
            entity::metric_history::ActiveModel {
                metric_key: ActiveValue::Set(point.metric_key.clone()),
                clan_name: ActiveValue::Set(point.clan_name.clone()),
                rank: ActiveValue::Set(point.rank.and_then(|rank| i32::try_from(rank).ok())),
                value: ActiveValue::Set(point.value),
                recorded_at: ActiveValue::Set(point.recorded_at),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(points.len())
    }

    /// Gets the rows of one metric recorded at or after a cutoff, oldest first.
    ///
    /// # Arguments
    /// - `metric_key` - Catalog key of the metric
    /// - `cutoff` - Earliest recording time to include
    pub async fn since(
        &self,
        metric_key: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, DbErr> {
        let rows = entity::prelude::MetricHistory::find()
            .filter(entity::metric_history::Column::MetricKey.eq(metric_key))
            .filter(entity::metric_history::Column::RecordedAt.gte(cutoff))
            .order_by_asc(entity::metric_history::Column::RecordedAt)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(HistoryPoint::from_entity).collect())
    }

    /// Deletes rows recorded before a cutoff.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted
    /// - `Err(DbErr)` - Database error during delete
    pub async fn prune(&self, before: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::MetricHistory::delete_many()
            .filter(entity::metric_history::Column::RecordedAt.lt(before))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
