//! Leaderboard data source.
//!
//! The poll cycle and commands only see the `LeaderboardSource` trait, so they can run
//! against canned tables in tests. `RusticatedClient` is the HTTP implementation.

pub mod rusticated;

#[cfg(test)]
pub mod fake;

use serenity::async_trait;

use crate::{
    error::api::ApiError,
    model::leaderboard::{LeaderboardRow, TableQuery},
};

#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Fetches one leaderboard table.
    ///
    /// # Arguments
    /// - `query` - Entity kind, group, sort column and row limit
    ///
    /// # Returns
    /// - `Ok(Vec<LeaderboardRow>)` - Rows in rank order
    /// - `Err(ApiError)` - Network failure, bad status or malformed body
    async fn fetch_table(&self, query: &TableQuery) -> Result<Vec<LeaderboardRow>, ApiError>;
}
