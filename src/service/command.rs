//! Executes parsed chat commands.
//!
//! Every command returns the messages to send back to the channel it came from. State
//! changes are flushed to the database before the reply is built, and commands that
//! change trackers or the toggle refresh the status embed.

use chrono::Utc;

use crate::{
    data::user_link::UserLinkRepository,
    error::AppError,
    model::{
        command::Command,
        leaderboard::{LeaderboardRow, TableQuery},
        metric::{self, METRICS},
        tracked::{EntityKind, EntityRef, TrackedEntity},
    },
    service::{
        embed,
        notifier::{select_deletable, Notifier, OutgoingMessage},
        persistent::PersistentEmbedService,
        wins::WinsService,
    },
    state::AppState,
};

/// How far back `clear` looks in the channel history.
pub const CLEAR_SCAN_LIMIT: usize = 200;

/// Discord rejects messages longer than 2000 characters.
const MESSAGE_LIMIT: usize = 1900;

/// Who sent a command and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub author_id: u64,
    pub channel_id: u64,
    /// Whether the author holds the admin role, or no admin role is configured.
    pub is_admin: bool,
}

pub struct CommandService<'a> {
    state: &'a AppState,
    notifier: &'a dyn Notifier,
}

impl<'a> CommandService<'a> {
    pub fn new(state: &'a AppState, notifier: &'a dyn Notifier) -> Self {
        Self { state, notifier }
    }

    /// Runs a command and returns the replies.
    ///
    /// Admin-only commands from non-admins are answered with a refusal and do nothing.
    ///
    /// # Arguments
    /// - `ctx` - Author, channel and role of the caller
    /// - `command` - Parsed command
    ///
    /// # Returns
    /// - `Ok(Vec<OutgoingMessage>)` - Replies for the command's channel
    /// - `Err(AppError)` - Unexpected database or Discord failure
    pub async fn execute(
        &self,
        ctx: &CommandContext,
        command: Command,
    ) -> Result<Vec<OutgoingMessage>, AppError> {
        let prefix = &self.state.config.command_prefix;

        if command.requires_admin() && !ctx.is_admin {
            return Ok(vec![OutgoingMessage::text(format!(
                "You need the admin role to use `{}{}`.",
                prefix,
                command.name()
            ))]);
        }

        let replies = match command {
            Command::Help => vec![OutgoingMessage::embed(embed::help_embed(prefix))],
            Command::Status => {
                let bot = self.state.bot.lock().await;
                vec![OutgoingMessage::embed(embed::status_embed(&bot, prefix))]
            }
            Command::Lookup(steam_id) => vec![self.lookup(&steam_id).await],
            Command::Link(steam_id) => {
                UserLinkRepository::new(&self.state.db)
                    .upsert(ctx.author_id, &steam_id)
                    .await?;
                vec![OutgoingMessage::text(format!(
                    "Linked your Discord account to SteamID: `{steam_id}`"
                ))]
            }
            Command::Me => {
                let linked = UserLinkRepository::new(&self.state.db)
                    .find_steam_id(ctx.author_id)
                    .await?;
                match linked {
                    Some(steam_id) => vec![self.lookup(&steam_id).await],
                    None => vec![OutgoingMessage::text(format!(
                        "You don't have a linked SteamID yet. Use `{prefix}link 7656...` first."
                    ))],
                }
            }
            Command::Track { clan, stats } => vec![self.track_clan(&clan, stats).await],
            Command::Untrack(clan) => {
                let removed = self.untrack(&EntityRef::clan(&clan)).await;
                vec![OutgoingMessage::text(if removed {
                    format!("✅ Removed `{clan}` from the watched clans list.")
                } else {
                    format!("`{clan}` is not on the watched clans list.")
                })]
            }
            Command::TrackPlayer {
                steam_id,
                clan_label,
            } => vec![self.track_player(&steam_id, clan_label).await],
            Command::UntrackPlayer(steam_id) => {
                let removed = self.untrack(&EntityRef::player(&steam_id)).await;
                vec![OutgoingMessage::text(if removed {
                    format!("✅ Stopped tracking player `{steam_id}`.")
                } else {
                    format!("Player `{steam_id}` is not being tracked.")
                })]
            }
            Command::List => self.list().await,
            Command::Toggle => {
                let enabled = {
                    let mut bot = self.state.bot.lock().await;
                    bot.tracking_enabled = !bot.tracking_enabled;
                    self.state.persist(&mut bot).await;
                    bot.tracking_enabled
                };
                self.embeds().refresh_status().await;

                tracing::info!(
                    "Tracking {} by {}",
                    if enabled { "enabled" } else { "disabled" },
                    ctx.author_id
                );
                vec![OutgoingMessage::text(format!(
                    "✅ Watch-clan tracking is now **{}**.",
                    if enabled { "enabled" } else { "disabled" }
                ))]
            }
            Command::Clear => vec![self.clear(ctx.channel_id).await?],
            Command::Wins => self.wins().await?,
            Command::Init(kind) => {
                let embeds = self.embeds();
                let embed = embeds.build(kind, None, Utc::now()).await?;
                let message_id = self
                    .notifier
                    .send(self.state.config.channel_id, OutgoingMessage::embed(embed))
                    .await?;
                embeds.remember(kind, message_id).await;

                tracing::info!("Created persistent {} message {}", kind, message_id);
                vec![OutgoingMessage::text(format!(
                    "{} message created with ID `{}`. The bot will keep it updated.",
                    capitalize(kind.as_str()),
                    message_id
                ))]
            }
        };

        self.flush_if_dirty().await;

        Ok(replies)
    }

    fn embeds(&self) -> PersistentEmbedService<'_> {
        PersistentEmbedService::new(self.state, self.notifier)
    }

    /// Retries a write that failed earlier in this or a previous command.
    async fn flush_if_dirty(&self) {
        let mut bot = self.state.bot.lock().await;
        if bot.dirty {
            self.state.persist(&mut bot).await;
        }
    }

    /// Finds a player on the PvP kills table and builds their stats reply.
    async fn lookup(&self, steam_id: &str) -> OutgoingMessage {
        match self.find_player(steam_id).await {
            Ok(Some(row)) => OutgoingMessage::embed(embed::player_stats_embed(steam_id, &row)),
            Ok(None) => OutgoingMessage::text(format!(
                "I couldn't find `{steam_id}` on the current PvP leaderboard. \
                 Make sure they've played this wipe on the configured server."
            )),
            Err(e) => {
                tracing::error!("Error fetching player leaderboard for {}: {}", steam_id, e);
                OutgoingMessage::text(
                    "Error fetching player stats from Rusticated. Please try again later.",
                )
            }
        }
    }

    async fn find_player(&self, steam_id: &str) -> Result<Option<LeaderboardRow>, AppError> {
        let rows = self
            .state
            .source
            .fetch_table(&TableQuery::player(&metric::PVP_KILLS))
            .await?;

        Ok(rows
            .into_iter()
            .find(|row| row.steam_id.as_deref() == Some(steam_id)))
    }

    async fn track_clan(&self, clan: &str, stats: Vec<String>) -> OutgoingMessage {
        if let Some(unknown) = stats
            .iter()
            .find(|stat| !METRICS.iter().any(|metric| metric.sort_by == stat.as_str()))
        {
            return OutgoingMessage::text(format!(
                "Unknown stat `{unknown}`. Stats are leaderboard columns such as `kill_player` \
                 or `gathered_sulfur.ore`."
            ));
        }

        let scope = if stats.is_empty() {
            "all stats".to_string()
        } else {
            format!("stats: {}", stats.join(", "))
        };

        let added = {
            let mut bot = self.state.bot.lock().await;
            let added = bot.track(TrackedEntity::clan(clan, stats));
            self.state.persist(&mut bot).await;
            added
        };
        self.embeds().refresh_status().await;

        OutgoingMessage::text(if added {
            format!("✅ Added `{clan}` to the watched clans list ({scope}).")
        } else {
            format!("✅ Updated `{clan}` on the watched clans list ({scope}).")
        })
    }

    async fn track_player(&self, steam_id: &str, clan_label: Option<String>) -> OutgoingMessage {
        let label_note = clan_label
            .as_deref()
            .map(|label| format!(" as part of `{label}`"))
            .unwrap_or_default();

        let added = {
            let mut bot = self.state.bot.lock().await;
            let added = bot.track(TrackedEntity::player(steam_id, clan_label));
            self.state.persist(&mut bot).await;
            added
        };
        self.embeds().refresh_status().await;

        OutgoingMessage::text(if added {
            format!("✅ Now tracking player SteamID `{steam_id}`{label_note}.")
        } else {
            format!("Player `{steam_id}` is already being tracked; updated{label_note}.")
        })
    }

    async fn untrack(&self, entity: &EntityRef) -> bool {
        let removed = {
            let mut bot = self.state.bot.lock().await;
            let removed = bot.untrack(entity).is_some();
            if removed {
                self.state.persist(&mut bot).await;
            }
            removed
        };

        if removed {
            self.embeds().refresh_status().await;
        }
        removed
    }

    async fn list(&self) -> Vec<OutgoingMessage> {
        let bot = self.state.bot.lock().await;
        let prefix = &self.state.config.command_prefix;

        if bot.tracked.is_empty() {
            return vec![OutgoingMessage::text(format!(
                "Nothing is being tracked. Use `{prefix}track <clan>` or \
                 `{prefix}trackplayer <steamId64>` to add trackers."
            ))];
        }

        let mut lines = Vec::new();
        for kind in [EntityKind::Clan, EntityKind::Player] {
            let tracked: Vec<&TrackedEntity> = bot.tracked_of_kind(kind).collect();
            if tracked.is_empty() {
                continue;
            }

            lines.push(match kind {
                EntityKind::Clan => format!("**Tracked clans ({})**", tracked.len()),
                EntityKind::Player => format!("**Tracked players ({})**", tracked.len()),
            });
            for entry in tracked {
                let stats = if entry.metrics.is_empty() {
                    "all stats".to_string()
                } else {
                    entry.metrics.iter().cloned().collect::<Vec<_>>().join(", ")
                };
                lines.push(match &entry.clan_label {
                    Some(label) => format!("• `{}` ({}) — {}", entry.display_name, label, stats),
                    None => format!("• `{}` — {}", entry.display_name, stats),
                });
            }
        }

        chunk_lines(&lines, MESSAGE_LIMIT)
            .into_iter()
            .map(OutgoingMessage::text)
            .collect()
    }

    async fn clear(&self, channel_id: u64) -> Result<OutgoingMessage, AppError> {
        let keep = self.state.bot.lock().await.messages.keep_ids();
        let recent = self
            .notifier
            .recent_messages(channel_id, CLEAR_SCAN_LIMIT)
            .await?;

        let mut deleted = 0;
        for message_id in select_deletable(&recent, &keep) {
            match self.notifier.delete(channel_id, message_id).await {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!("Failed to delete message {}: {}", message_id, e),
            }
        }

        tracing::info!("Cleared {} messages in channel {}", deleted, channel_id);
        Ok(OutgoingMessage::text(format!(
            "Cleared {deleted} messages (kept pinned messages and bot embeds)."
        )))
    }

    async fn wins(&self) -> Result<Vec<OutgoingMessage>, AppError> {
        let config = &self.state.config;
        let service = WinsService::new(self.state.source.as_ref());

        let labels = service.winning_labels(&config.clan_name).await;
        let mut replies = vec![OutgoingMessage::embed(embed::wins_embed(
            &config.clan_name,
            &config.server_wipe_id,
            &config.server_id,
            &labels,
        ))];

        let links = UserLinkRepository::new(&self.state.db).get_all().await?;
        match service.member_stats(&links).await {
            Ok(messages) => replies.extend(messages),
            Err(e) => {
                tracing::error!("Error fetching member stats for wins: {}", e);
                replies.push(OutgoingMessage::text(format!(
                    "Error fetching player stats for {} members: `{}`",
                    config.clan_name, e
                )));
            }
        }

        Ok(replies)
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins lines into messages no longer than `limit` characters each.
fn chunk_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        if !current.is_empty() && current.len() + line.len() + 1 > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::fake::{clan_row, player_row, StaticSource},
        data::state::StateRepository,
        model::bot_state::PersistentKind,
        service::notifier::recording::RecordingNotifier,
        state::fixture::{self, CHANNEL_ID},
    };
    use std::sync::Arc;

    const STEAM: &str = "76561198000000001";

    fn ctx(is_admin: bool) -> CommandContext {
        CommandContext {
            author_id: 42,
            channel_id: CHANNEL_ID,
            is_admin,
        }
    }

    fn text(replies: &[OutgoingMessage]) -> &str {
        replies[0].content.as_deref().unwrap()
    }

    #[tokio::test]
    async fn refuses_admin_commands_for_members() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(false), Command::Untrack("Foo".to_string()))
            .await?;

        assert_eq!(text(&replies), "You need the admin role to use `!untrack`.");

        Ok(())
    }

    #[tokio::test]
    async fn track_and_untrack_persist() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();
        let service = CommandService::new(&state, &notifier);

        let replies = service
            .execute(
                &ctx(true),
                Command::Track {
                    clan: "Foo".to_string(),
                    stats: vec!["kill_player".to_string()],
                },
            )
            .await?;
        assert_eq!(
            text(&replies),
            "✅ Added `Foo` to the watched clans list (stats: kill_player)."
        );
        let stored = StateRepository::new(&state.db).load().await?;
        assert!(stored.tracked.contains_key(&EntityRef::clan("foo")));

        let replies = service
            .execute(&ctx(true), Command::Untrack("FOO".to_string()))
            .await?;
        assert_eq!(text(&replies), "✅ Removed `FOO` from the watched clans list.");
        let stored = StateRepository::new(&state.db).load().await?;
        assert!(stored.tracked.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_is_retried_by_the_next_command() -> Result<(), AppError> {
        use sea_orm::{sea_query::Table, ConnectionTrait, Schema};

        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();
        let service = CommandService::new(&state, &notifier);

        state
            .db
            .execute(&Table::drop().table(entity::prelude::BotSetting).to_owned())
            .await?;

        service
            .execute(
                &ctx(true),
                Command::Track {
                    clan: "Walo Bots".to_string(),
                    stats: Vec::new(),
                },
            )
            .await?;
        {
            let bot = state.bot.lock().await;
            assert!(bot.dirty);
            assert!(bot.tracked.contains_key(&EntityRef::clan("walo bots")));
        }

        let backend = state.db.get_database_backend();
        state
            .db
            .execute(&Schema::new(backend).create_table_from_entity(entity::prelude::BotSetting))
            .await?;

        service.execute(&ctx(false), Command::List).await?;

        assert!(!state.bot.lock().await.dirty);
        let stored = StateRepository::new(&state.db).load().await?;
        assert!(stored.tracked.contains_key(&EntityRef::clan("walo bots")));

        Ok(())
    }

    #[tokio::test]
    async fn track_rejects_unknown_stats() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(
                &ctx(true),
                Command::Track {
                    clan: "Foo".to_string(),
                    stats: vec!["nonsense".to_string()],
                },
            )
            .await?;

        assert!(text(&replies).starts_with("Unknown stat `nonsense`"));
        assert!(state.bot.lock().await.tracked.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn toggle_flips_and_refreshes_status() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[("STATUS_MESSAGE_ID", "8")]).await;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(true), Command::Toggle)
            .await?;

        assert_eq!(text(&replies), "✅ Watch-clan tracking is now **enabled**.");
        assert!(state.bot.lock().await.tracking_enabled);
        let edits = notifier.edits.lock().unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, 8);

        Ok(())
    }

    #[tokio::test]
    async fn link_then_me_shows_stats() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        source.set_table(
            EntityKind::Player,
            "pvp",
            "kill_player",
            vec![player_row(STEAM, "bob", 3, &[("kill_player", 7.0)])],
        );
        let state = fixture::state(source, &[]).await;
        let notifier = RecordingNotifier::new();
        let service = CommandService::new(&state, &notifier);

        let replies = service.execute(&ctx(false), Command::Me).await?;
        assert!(text(&replies).starts_with("You don't have a linked SteamID yet."));

        service
            .execute(&ctx(false), Command::Link(STEAM.to_string()))
            .await?;
        let replies = service.execute(&ctx(false), Command::Me).await?;

        assert!(replies[0].embed.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn lookup_reports_missing_player() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(false), Command::Lookup(STEAM.to_string()))
            .await?;

        assert!(text(&replies).starts_with("I couldn't find"));

        Ok(())
    }

    #[tokio::test]
    async fn clear_keeps_pinned_and_persistent_messages() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();
        let pinned = notifier.seed(CHANNEL_ID, true);
        let embed = notifier.seed(CHANNEL_ID, false);
        for _ in 0..3 {
            notifier.seed(CHANNEL_ID, false);
        }
        state
            .bot
            .lock()
            .await
            .messages
            .set(PersistentKind::Leaderboard, embed);

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(true), Command::Clear)
            .await?;

        assert_eq!(
            text(&replies),
            "Cleared 3 messages (kept pinned messages and bot embeds)."
        );
        assert_eq!(notifier.remaining(), vec![pinned, embed]);

        Ok(())
    }

    #[tokio::test]
    async fn init_posts_and_stores_message_id() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(true), Command::Init(PersistentKind::Help))
            .await?;

        let stored = StateRepository::new(&state.db).load().await?;
        let id = stored.messages.get(PersistentKind::Help).unwrap();
        assert_eq!(
            text(&replies),
            format!("Help message created with ID `{id}`. The bot will keep it updated.")
        );

        Ok(())
    }

    #[tokio::test]
    async fn wins_lists_first_places_and_linked_members() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        source.set_table(
            EntityKind::Clan,
            "pvp",
            "kill_player",
            vec![clan_row("Walobots", 1, &[("kill_player", 90.0)])],
        );
        let state = fixture::state(source, &[]).await;
        UserLinkRepository::new(&state.db).upsert(42, STEAM).await?;
        let notifier = RecordingNotifier::new();

        let replies = CommandService::new(&state, &notifier)
            .execute(&ctx(false), Command::Wins)
            .await?;

        assert_eq!(replies.len(), 2);
        assert!(replies[0].embed.is_some());
        assert!(replies[1]
            .content
            .as_deref()
            .unwrap()
            .starts_with("Could not find stats for SteamID"));

        Ok(())
    }

    #[test]
    fn chunks_long_lists() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i:02}")).collect();

        let chunks = chunk_lines(&lines, 20);

        assert!(chunks.iter().all(|chunk| chunk.len() <= 20));
        assert_eq!(chunks.join("\n"), lines.join("\n"));
    }
}
