use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use super::helpers::{next_id, steam_id};

/// Factory for creating tracked entity rows with customizable fields.
///
/// Defaults to a clan named `Clan {id}` watching every stat.
pub struct TrackedEntityFactory<'a> {
    db: &'a DatabaseConnection,
    kind: String,
    identifier: String,
    display_name: String,
    clan_label: Option<String>,
    metrics: Vec<String>,
}

impl<'a> TrackedEntityFactory<'a> {
    /// Creates a new factory with default clan values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let name = format!("Clan {}", next_id());
        Self {
            db,
            kind: "clan".to_string(),
            identifier: name.to_lowercase(),
            display_name: name,
            clan_label: None,
            metrics: Vec::new(),
        }
    }

    /// Turns the row into a clan tracker; the identifier is the lowercased name.
    pub fn clan(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.kind = "clan".to_string();
        self.identifier = name.to_lowercase();
        self.display_name = name;
        self
    }

    /// Turns the row into a player tracker for the given SteamID64.
    pub fn player(mut self, steam: impl Into<String>) -> Self {
        let steam = steam.into();
        self.kind = "player".to_string();
        self.identifier = steam.clone();
        self.display_name = steam;
        self
    }

    /// Sets the manual clan association of a player tracker.
    pub fn clan_label(mut self, label: impl Into<String>) -> Self {
        self.clan_label = Some(label.into());
        self
    }

    /// Restricts the tracker to the given stat names.
    pub fn metrics(mut self, metrics: &[&str]) -> Self {
        self.metrics = metrics.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Builds and inserts the tracked entity row.
    ///
    /// # Returns
    /// - `Ok(entity::tracked_entity::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::tracked_entity::Model, DbErr> {
        entity::tracked_entity::ActiveModel {
            kind: ActiveValue::Set(self.kind),
            identifier: ActiveValue::Set(self.identifier),
            display_name: ActiveValue::Set(self.display_name),
            clan_label: ActiveValue::Set(self.clan_label),
            metrics: ActiveValue::Set(self.metrics.join(",")),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a clan tracker watching every stat.
pub async fn create_tracked_clan(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entity::tracked_entity::Model, DbErr> {
    TrackedEntityFactory::new(db).clan(name).build().await
}

/// Creates a player tracker with a generated SteamID64.
pub async fn create_tracked_player(
    db: &DatabaseConnection,
) -> Result<entity::tracked_entity::Model, DbErr> {
    TrackedEntityFactory::new(db)
        .player(steam_id(next_id()))
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_clan_with_lowercase_identifier() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(TrackedEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let row = create_tracked_clan(db, "Walobots").await?;

        assert_eq!(row.kind, "clan");
        assert_eq!(row.identifier, "walobots");
        assert_eq!(row.display_name, "Walobots");
        assert!(row.metrics.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn creates_player_with_label_and_metrics() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(TrackedEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let row = TrackedEntityFactory::new(db)
            .player("76561198000000001")
            .clan_label("Walobots")
            .metrics(&["kill_player", "death_player"])
            .build()
            .await?;

        assert_eq!(row.kind, "player");
        assert_eq!(row.clan_label.as_deref(), Some("Walobots"));
        assert_eq!(row.metrics, "kill_player,death_player");

        let other = create_tracked_player(db).await?;
        assert_eq!(other.identifier.len(), 17);

        Ok(())
    }
}
