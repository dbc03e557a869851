//! Tracked entity repository.
//!
//! Holds the clans and players the bot watches. The table is rewritten as a whole when
//! the in-memory state is flushed.

use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, QueryOrder};

use crate::{error::AppError, model::tracked::TrackedEntity};

pub struct TrackedEntityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TrackedEntityRepository<'a, C> {
    /// Creates a new TrackedEntityRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets every tracked entity in insertion order.
    ///
    /// # Returns
    /// - `Ok(Vec<TrackedEntity>)` - All trackers
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr)` - A stored row has an unknown kind
    pub async fn get_all(&self) -> Result<Vec<TrackedEntity>, AppError> {
        let rows = entity::prelude::TrackedEntity::find()
            .order_by_asc(entity::tracked_entity::Column::Id)
            .all(self.db)
            .await?;

        rows.into_iter()
            .map(|row| TrackedEntity::from_entity(row).map_err(AppError::from))
            .collect()
    }

    /// Replaces every stored tracker with the given set.
    ///
    /// # Arguments
    /// - `tracked` - Trackers to persist
    ///
    /// # Returns
    /// - `Ok(())` - Table now holds exactly the given trackers
    /// - `Err(DbErr)` - Database error during delete or insert
    pub async fn replace_all<'t>(
        &self,
        tracked: impl IntoIterator<Item = &'t TrackedEntity>,
    ) -> Result<(), DbErr> {
        entity::prelude::TrackedEntity::delete_many()
            .exec(self.db)
            .await?;

        for tracked in tracked {
            entity::tracked_entity::ActiveModel {
                kind: ActiveValue::Set(tracked.entity.kind.as_str().to_string()),
                identifier: ActiveValue::Set(tracked.entity.identifier.clone()),
                display_name: ActiveValue::Set(tracked.display_name.clone()),
                clan_label: ActiveValue::Set(tracked.clan_label.clone()),
                metrics: ActiveValue::Set(tracked.metrics_column()),
                created_at: ActiveValue::Set(tracked.created_at),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }
}
