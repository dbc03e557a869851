//! Domain models for tracked clans and players.

use chrono::{DateTime, Utc};
use std::{collections::BTreeSet, fmt};

use crate::error::internal::InternalError;

/// Whether a tracker follows a clan or a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Clan,
    Player,
}

impl EntityKind {
    /// Storage and API name of the kind (`clan` / `player`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clan => "clan",
            EntityKind::Player => "player",
        }
    }

    /// Parses the storage name of a kind.
    ///
    /// # Returns
    /// - `Ok(EntityKind)` - Known kind
    /// - `Err(InternalError::UnknownEntityKind)` - Any other value
    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "clan" => Ok(EntityKind::Clan),
            "player" => Ok(EntityKind::Player),
            other => Err(InternalError::UnknownEntityKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a tracked entity.
///
/// Clan identifiers are the lowercased clan name so lookups are case-insensitive.
/// Player identifiers are SteamID64 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub identifier: String,
}

impl EntityRef {
    pub fn clan(name: &str) -> Self {
        Self {
            kind: EntityKind::Clan,
            identifier: name.trim().to_lowercase(),
        }
    }

    pub fn player(steam_id: &str) -> Self {
        Self {
            kind: EntityKind::Player,
            identifier: steam_id.trim().to_string(),
        }
    }
}

/// A clan or player the bot polls and alerts on.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    pub entity: EntityRef,
    /// Name as typed by the user or seen on the leaderboard.
    pub display_name: String,
    /// Manual clan association for players.
    pub clan_label: Option<String>,
    /// Watched stat names. Empty watches every numeric stat.
    pub metrics: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackedEntity {
    /// Creates a clan tracker.
    ///
    /// # Arguments
    /// - `name` - Clan name as displayed; the identifier is its lowercase form
    /// - `metrics` - Stat names to watch, empty for all
    pub fn clan(name: &str, metrics: impl IntoIterator<Item = String>) -> Self {
        Self {
            entity: EntityRef::clan(name),
            display_name: name.trim().to_string(),
            clan_label: None,
            metrics: metrics.into_iter().collect(),
            created_at: Utc::now(),
        }
    }

    /// Creates a player tracker watching every stat.
    ///
    /// # Arguments
    /// - `steam_id` - SteamID64 of the player
    /// - `clan_label` - Optional manual clan association
    pub fn player(steam_id: &str, clan_label: Option<String>) -> Self {
        Self {
            entity: EntityRef::player(steam_id),
            display_name: steam_id.trim().to_string(),
            clan_label,
            metrics: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether alerts should be produced for the given stat.
    pub fn watches(&self, stat: &str) -> bool {
        self.metrics.is_empty() || self.metrics.contains(stat)
    }

    /// Converts an entity model to a tracked entity at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(TrackedEntity)` - Converted domain model
    /// - `Err(InternalError::UnknownEntityKind)` - Stored kind is not recognized
    pub fn from_entity(entity: entity::tracked_entity::Model) -> Result<Self, InternalError> {
        Ok(Self {
            entity: EntityRef {
                kind: EntityKind::parse(&entity.kind)?,
                identifier: entity.identifier,
            },
            display_name: entity.display_name,
            clan_label: entity.clan_label,
            metrics: entity
                .metrics
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect(),
            created_at: entity.created_at,
        })
    }

    /// Watched stats in their stored comma separated form.
    pub fn metrics_column(&self) -> String {
        self.metrics.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

/// Checks that a string is a 17 digit SteamID64.
pub fn is_valid_steam_id(value: &str) -> bool {
    let cleaned = value.trim();
    cleaned.len() == 17 && cleaned.chars().all(|c| c.is_ascii_digit())
}
