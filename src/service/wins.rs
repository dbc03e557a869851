//! Wipe winner summary for the configured clan.

use crate::{
    api::LeaderboardSource,
    error::AppError,
    model::{
        leaderboard::{LeaderboardRow, TableQuery},
        metric::{self, METRICS},
    },
    service::{embed, notifier::OutgoingMessage},
};

/// Whether the clan holds rank one in a clan table.
///
/// Only the first row counts; names compare case-insensitively.
pub fn is_first(rows: &[LeaderboardRow], clan: &str) -> bool {
    rows.first()
        .and_then(|row| row.clan_name.as_deref())
        .is_some_and(|name| name.trim().eq_ignore_ascii_case(clan.trim()))
}

/// Builds the wins summary plus one stats message per linked member.
pub struct WinsService<'a> {
    source: &'a dyn LeaderboardSource,
}

impl<'a> WinsService<'a> {
    pub fn new(source: &'a dyn LeaderboardSource) -> Self {
        Self { source }
    }

    /// Collects the labels of every catalog metric the clan currently leads.
    ///
    /// A table that fails to load is logged and skipped.
    pub async fn winning_labels(&self, clan: &str) -> Vec<&'static str> {
        let mut wins = Vec::new();

        for metric in METRICS {
            match self.source.fetch_table(&TableQuery::clan(metric)).await {
                Ok(rows) if is_first(&rows, clan) => wins.push(metric.label),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping {} in wins summary: {}", metric.key, e),
            }
        }

        wins
    }

    /// Builds the stats messages for linked members, mentioning each one.
    ///
    /// # Arguments
    /// - `links` - (Discord user id, SteamID64) pairs
    ///
    /// # Returns
    /// - `Ok(Vec<OutgoingMessage>)` - One message per link
    /// - `Err(AppError::ApiErr)` - The PvP player table could not be fetched
    pub async fn member_stats(&self, links: &[(u64, String)]) -> Result<Vec<OutgoingMessage>, AppError> {
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .source
            .fetch_table(&TableQuery::player(&metric::PVP_KILLS))
            .await?;

        Ok(links
            .iter()
            .map(|(discord_id, steam_id)| {
                match rows.iter().find(|row| row.steam_id.as_deref() == Some(steam_id.as_str())) {
                    Some(row) => OutgoingMessage::embed(embed::player_stats_embed(steam_id, row))
                        .with_content(format!("<@{discord_id}>")),
                    None => OutgoingMessage::text(format!(
                        "Could not find stats for SteamID `{steam_id}` on the PvP leaderboard."
                    )),
                }
            })
            .collect())
    }
}
