//! Key/value settings repository.
//!
//! Stores the tracking toggle, the time of the last poll cycle and the message ids of
//! persistent embeds.

use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};
use std::collections::BTreeMap;

/// Setting key of the alert toggle (`true` / `false`).
pub const TRACKING_ENABLED_KEY: &str = "tracking_enabled";

/// Setting key of the last successful cycle time (RFC 3339).
pub const LAST_CYCLE_KEY: &str = "last_cycle_at";

pub struct SettingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a single setting.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Stored value
    /// - `Ok(None)` - Setting was never written
    /// - `Err(DbErr)` - Database error during query
    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        let row = entity::prelude::BotSetting::find_by_id(key.to_string())
            .one(self.db)
            .await?;

        Ok(row.map(|row| row.value))
    }

    /// Gets every setting keyed by name.
    pub async fn get_all(&self) -> Result<BTreeMap<String, String>, DbErr> {
        let rows = entity::prelude::BotSetting::find().all(self.db).await?;

        Ok(rows.into_iter().map(|row| (row.key, row.value)).collect())
    }

    /// Creates or overwrites a setting.
    ///
    /// # Arguments
    /// - `key` - Setting name
    /// - `value` - New value
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DbErr> {
        let model = entity::bot_setting::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };

        if self.get(key).await?.is_some() {
            model.update(self.db).await?;
        } else {
            model.insert(self.db).await?;
        }

        Ok(())
    }

    /// Deletes a setting if present.
    ///
    /// # Returns
    /// - `Ok(true)` - Setting existed and was removed
    /// - `Ok(false)` - Nothing to remove
    pub async fn delete(&self, key: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::BotSetting::delete_by_id(key.to_string())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
