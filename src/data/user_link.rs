//! Discord to Steam account links created by the `link` command.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::{error::AppError, util::parse::parse_u64_from_string};

pub struct UserLinkRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserLinkRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Links a Discord user to a SteamID64, replacing any previous link.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user id
    /// - `steam_id` - Validated SteamID64
    ///
    /// # Returns
    /// - `Ok(())` - Link stored
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(&self, discord_id: u64, steam_id: &str) -> Result<(), DbErr> {
        let existing = entity::prelude::UserLink::find()
            .filter(entity::user_link::Column::DiscordId.eq(discord_id.to_string()))
            .one(self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: entity::user_link::ActiveModel = row.into();
                active.steam_id = ActiveValue::Set(steam_id.to_string());
                active.updated_at = ActiveValue::Set(Utc::now());
                active.update(self.db).await?;
            }
            None => {
                entity::user_link::ActiveModel {
                    discord_id: ActiveValue::Set(discord_id.to_string()),
                    steam_id: ActiveValue::Set(steam_id.to_string()),
                    updated_at: ActiveValue::Set(Utc::now()),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Gets the SteamID64 linked to a Discord user.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Linked SteamID64
    /// - `Ok(None)` - User never linked an account
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_steam_id(&self, discord_id: u64) -> Result<Option<String>, DbErr> {
        let row = entity::prelude::UserLink::find()
            .filter(entity::user_link::Column::DiscordId.eq(discord_id.to_string()))
            .one(self.db)
            .await?;

        Ok(row.map(|row| row.steam_id))
    }

    /// Gets every link as (Discord user id, SteamID64).
    ///
    /// # Returns
    /// - `Ok(Vec<(u64, String)>)` - Links in creation order
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr)` - A stored Discord id is not numeric
    pub async fn get_all(&self) -> Result<Vec<(u64, String)>, AppError> {
        let rows = entity::prelude::UserLink::find()
            .order_by_asc(entity::user_link::Column::Id)
            .all(self.db)
            .await?;

        rows.into_iter()
            .map(|row| Ok((parse_u64_from_string(row.discord_id)?, row.steam_id)))
            .collect()
    }
}
