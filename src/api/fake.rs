//! Canned leaderboard source for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use serenity::async_trait;

use crate::{
    api::LeaderboardSource,
    error::api::ApiError,
    model::{
        leaderboard::{LeaderboardRow, TableQuery},
        tracked::EntityKind,
    },
};

/// Serves fixed rows per (kind, group, sort column); unknown tables are empty.
#[derive(Default)]
pub struct StaticSource {
    tables: Mutex<HashMap<(EntityKind, String, String), Vec<LeaderboardRow>>>,
    failing: Mutex<Option<(EntityKind, String, String)>>,
    pub requests: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_table(&self, kind: EntityKind, group: &str, sort_by: &str, rows: Vec<LeaderboardRow>) {
        self.tables
            .lock()
            .unwrap()
            .insert((kind, group.to_string(), sort_by.to_string()), rows);
    }

    /// Makes one table answer with a malformed-response error.
    pub fn fail_table(&self, kind: EntityKind, group: &str, sort_by: &str) {
        *self.failing.lock().unwrap() = Some((kind, group.to_string(), sort_by.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeaderboardSource for StaticSource {
    async fn fetch_table(&self, query: &TableQuery) -> Result<Vec<LeaderboardRow>, ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let key = (query.kind, query.group.clone(), query.sort_by.clone());

        if self.failing.lock().unwrap().as_ref() == Some(&key) {
            return Err(ApiError::Malformed("missing data.entries".to_string()));
        }

        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}

/// Clan row with the given stats.
pub fn clan_row(name: &str, rank: i64, stats: &[(&str, f64)]) -> LeaderboardRow {
    LeaderboardRow {
        rank: Some(rank),
        clan_name: Some(name.to_string()),
        stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        ..Default::default()
    }
}

/// Player row with the given stats.
pub fn player_row(steam_id: &str, username: &str, rank: i64, stats: &[(&str, f64)]) -> LeaderboardRow {
    LeaderboardRow {
        rank: Some(rank),
        steam_id: Some(steam_id.to_string()),
        username: Some(username.to_string()),
        stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        ..Default::default()
    }
}
