//! Persistent embeds the bot keeps editing in place.

use chrono::{DateTime, Duration, Utc};
use serenity::all::CreateEmbed;
use std::collections::BTreeMap;

use crate::{
    data::history::HistoryRepository,
    error::AppError,
    model::{
        bot_state::PersistentKind,
        history::compute_trend,
        leaderboard::{LeaderboardRow, TableQuery},
        metric::{self, DISPLAY_METRICS, TREND_METRICS},
    },
    service::{
        embed,
        notifier::{Notifier, OutgoingMessage},
    },
    state::AppState,
};

/// Window covered by the trend embed.
pub const TREND_WINDOW_HOURS: i64 = 12;

pub struct PersistentEmbedService<'a> {
    state: &'a AppState,
    notifier: &'a dyn Notifier,
}

impl<'a> PersistentEmbedService<'a> {
    pub fn new(state: &'a AppState, notifier: &'a dyn Notifier) -> Self {
        Self { state, notifier }
    }

    /// Builds the current embed for a persistent message kind.
    ///
    /// The leaderboard is fetched live; pass `tables` to reuse rows from a poll cycle.
    ///
    /// # Arguments
    /// - `kind` - Which embed to build
    /// - `tables` - Clan tables keyed by metric key, if already fetched
    /// - `now` - Update time
    pub async fn build(
        &self,
        kind: PersistentKind,
        tables: Option<&BTreeMap<&str, Vec<LeaderboardRow>>>,
        now: DateTime<Utc>,
    ) -> Result<CreateEmbed, AppError> {
        let config = &self.state.config;

        match kind {
            PersistentKind::Help => Ok(embed::help_embed(&config.command_prefix)),
            PersistentKind::Status => {
                let bot = self.state.bot.lock().await;
                Ok(embed::status_embed(&bot, &config.command_prefix))
            }
            PersistentKind::Trend => self.trend(now).await,
            PersistentKind::Leaderboard => match tables {
                Some(tables) => embed::leaderboard_embed(tables, &config.server_id, now),
                None => {
                    let tables = self.fetch_display_tables().await?;
                    embed::leaderboard_embed(&tables, &config.server_id, now)
                }
            },
        }
    }

    /// Edits the stored message for `kind`, posting a new one when needed.
    ///
    /// If the stored message cannot be edited (usually because it was deleted) a fresh
    /// one is posted and its id stored. Without a stored id, a message is only posted
    /// when `post_if_missing` is set.
    ///
    /// # Returns
    /// - `Ok(Some(u64))` - Id of the message now showing the embed
    /// - `Ok(None)` - Nothing stored and nothing posted
    /// - `Err(AppError::DiscordErr)` - Posting the replacement failed
    pub async fn publish(
        &self,
        kind: PersistentKind,
        embed: CreateEmbed,
        post_if_missing: bool,
    ) -> Result<Option<u64>, AppError> {
        let channel_id = self.state.config.channel_id;
        let message = OutgoingMessage::embed(embed);
        let existing = self.state.bot.lock().await.messages.get(kind);

        match existing {
            Some(message_id) => {
                match self.notifier.edit(channel_id, message_id, message.clone()).await {
                    Ok(()) => return Ok(Some(message_id)),
                    Err(e) => tracing::warn!(
                        "Failed to edit {} message {}, posting a new one: {}",
                        kind,
                        message_id,
                        e
                    ),
                }
            }
            None if !post_if_missing => return Ok(None),
            None => {}
        }

        let message_id = self.notifier.send(channel_id, message).await?;
        self.remember(kind, message_id).await;

        Ok(Some(message_id))
    }

    /// Stores a freshly posted message id for `kind` and flushes state.
    pub async fn remember(&self, kind: PersistentKind, message_id: u64) {
        let mut bot = self.state.bot.lock().await;
        bot.messages.set(kind, message_id);
        self.state.persist(&mut bot).await;
    }

    /// Refreshes the status embed if one was ever posted.
    pub async fn refresh_status(&self) {
        let result = match self.build(PersistentKind::Status, None, Utc::now()).await {
            Ok(embed) => self.publish(PersistentKind::Status, embed, false).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to refresh status embed: {}", e);
        }
    }

    async fn trend(&self, now: DateTime<Utc>) -> Result<CreateEmbed, AppError> {
        let history = HistoryRepository::new(&self.state.db);
        let cutoff = now - Duration::hours(TREND_WINDOW_HOURS);

        let mut trends = BTreeMap::new();
        for key in TREND_METRICS {
            let points = history.since(key, cutoff).await?;
            trends.insert(*key, compute_trend(&points));
        }

        embed::trend_embed(&trends, &self.state.config.server_id, now)
    }

    async fn fetch_display_tables(&self) -> Result<BTreeMap<&'static str, Vec<LeaderboardRow>>, AppError> {
        let mut tables = BTreeMap::new();

        for key in DISPLAY_METRICS {
            let Some(metric) = metric::find(key) else {
                continue;
            };
            let rows = self.state.source.fetch_table(&TableQuery::clan(metric)).await?;
            tables.insert(*key, rows);
        }

        Ok(tables)
    }
}
