//! Leaderboard API response shapes and the rows the bot works with.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{
    error::api::ApiError,
    model::{metric::Metric, tracked::EntityKind},
    util::parse::{parse_identifier_value, parse_integer_value, parse_stat_value},
};

/// Rows requested per table.
pub const TABLE_LIMIT: u32 = 50;

/// Raw response body: `{ "success": bool, "data": { "entries": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<LeaderboardData>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardData {
    #[serde(default)]
    pub entries: Option<Vec<RawEntry>>,
}

/// One entry as the API returns it. Clan tables carry names, player tables ids.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "clanName")]
    pub clan_name: Option<String>,
    #[serde(default, rename = "clanTag")]
    pub clan_tag: Option<String>,
    #[serde(default)]
    pub rank: Option<Value>,
    #[serde(default, rename = "steamId")]
    pub steam_id: Option<Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub stats: Option<Map<String, Value>>,
}

impl LeaderboardResponse {
    /// Converts the body into rows.
    ///
    /// # Returns
    /// - `Ok(Vec<LeaderboardRow>)` - Entries in API order
    /// - `Err(ApiError::Malformed)` - `success` is false or `data.entries` is absent
    pub fn into_rows(self) -> Result<Vec<LeaderboardRow>, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Malformed("success flag is false".to_string()));
        }

        let entries = self
            .data
            .and_then(|data| data.entries)
            .ok_or_else(|| ApiError::Malformed("missing data.entries".to_string()))?;

        Ok(entries.into_iter().map(LeaderboardRow::from_raw).collect())
    }
}

/// A leaderboard entry with numeric stats only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardRow {
    pub rank: Option<i64>,
    /// Clan name for clan tables, the player's clan (if any) for player tables.
    pub clan_name: Option<String>,
    pub steam_id: Option<String>,
    pub username: Option<String>,
    pub stats: BTreeMap<String, f64>,
}

impl LeaderboardRow {
    fn from_raw(raw: RawEntry) -> Self {
        let clan_name = [raw.name, raw.clan_name, raw.clan_tag]
            .into_iter()
            .flatten()
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty());

        let stats = raw
            .stats
            .unwrap_or_default()
            .iter()
            .filter_map(|(stat, value)| parse_stat_value(value).map(|v| (stat.clone(), v)))
            .collect();

        Self {
            rank: raw.rank.as_ref().and_then(parse_integer_value),
            clan_name,
            steam_id: raw.steam_id.as_ref().and_then(parse_identifier_value),
            username: raw.username,
            stats,
        }
    }

    /// Numeric stat value, if present.
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }
}

/// Parameters of a single table request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub kind: EntityKind,
    pub group: String,
    pub sort_by: String,
    pub limit: u32,
}

impl TableQuery {
    /// Clan table sorted by the metric's column.
    pub fn clan(metric: &Metric) -> Self {
        Self {
            kind: EntityKind::Clan,
            group: metric.group.to_string(),
            sort_by: metric.sort_by.to_string(),
            limit: TABLE_LIMIT,
        }
    }

    /// Player table of the metric's group, sorted by its column.
    pub fn player(metric: &Metric) -> Self {
        Self {
            kind: EntityKind::Player,
            ..Self::clan(metric)
        }
    }
}
