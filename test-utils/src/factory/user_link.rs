use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Links a Discord user id to a SteamID64.
pub async fn create_user_link(
    db: &DatabaseConnection,
    discord_id: &str,
    steam_id: &str,
) -> Result<entity::user_link::Model, DbErr> {
    entity::user_link::ActiveModel {
        discord_id: ActiveValue::Set(discord_id.to_string()),
        steam_id: ActiveValue::Set(steam_id.to_string()),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
