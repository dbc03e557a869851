use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts one metric history row.
///
/// # Arguments
/// - `db` - Database connection
/// - `metric_key` - Catalog key of the metric, e.g. `pvp_kills`
/// - `clan_name` - Clan the value belongs to
/// - `value` - Observed value
/// - `recorded_at` - Observation time
///
/// # Returns
/// - `Ok(entity::metric_history::Model)` - Created row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_history_row(
    db: &DatabaseConnection,
    metric_key: &str,
    clan_name: &str,
    value: f64,
    recorded_at: DateTime<Utc>,
) -> Result<entity::metric_history::Model, DbErr> {
    entity::metric_history::ActiveModel {
        metric_key: ActiveValue::Set(metric_key.to_string()),
        clan_name: ActiveValue::Set(clan_name.to_string()),
        rank: ActiveValue::Set(None),
        value: ActiveValue::Set(value),
        recorded_at: ActiveValue::Set(recorded_at),
        ..Default::default()
    }
    .insert(db)
    .await
}
