//! Application state shared by the Discord handler and the poll scheduler.
//!
//! `AppState` is initialized once during startup and cloned into the event handler and
//! every scheduled job. All fields are cheap to clone:
//! - `DatabaseConnection` is a connection pool (clones share the pool)
//! - `Config` and `BotState` sit behind `Arc`
//! - `Arc<dyn LeaderboardSource>` is a reference-counted pointer

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    api::LeaderboardSource,
    config::Config,
    data::state::StateRepository,
    error::AppError,
    model::bot_state::BotState,
};

#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the SQLite state database.
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    /// Trackers, toggle, snapshot and persistent message ids.
    ///
    /// Commands and the poll cycle take this lock for their state changes and the
    /// flush that follows, never across leaderboard fetches.
    pub bot: Arc<Mutex<BotState>>,
    /// Held for the duration of a poll cycle so ticks never overlap.
    pub poll_guard: Arc<Mutex<()>>,
    pub source: Arc<dyn LeaderboardSource>,
    /// Running scheduler, kept so shutdown can stop it.
    pub scheduler: Arc<Mutex<Option<JobScheduler>>>,
}

impl AppState {
    /// Loads persisted state and merges in the environment's watch lists.
    ///
    /// A stored tracking toggle wins over `TRACKING_ENABLED`; message ids from the
    /// environment only fill kinds that have no stored id.
    ///
    /// # Arguments
    /// - `db` - Migrated database connection
    /// - `config` - Application configuration
    /// - `source` - Leaderboard source used by the poll cycle and commands
    ///
    /// # Returns
    /// - `Ok(AppState)` - Ready state, already written back once
    /// - `Err(AppError)` - Stored state could not be read
    pub async fn init(
        db: DatabaseConnection,
        config: Config,
        source: Arc<dyn LeaderboardSource>,
    ) -> Result<Self, AppError> {
        let stored = StateRepository::new(&db).load().await?;

        let mut bot = BotState {
            tracking_enabled: stored.tracking_enabled.unwrap_or(config.tracking_enabled),
            tracked: stored.tracked,
            snapshot: stored.snapshot,
            messages: stored.messages,
            dirty: false,
        };
        bot.messages.fill_from_config(&config.message_ids);
        let seeded = bot.seed_from_config(&config);

        tracing::info!(
            "Loaded {} trackers ({} from environment), tracking {}",
            bot.tracked.len(),
            seeded,
            if bot.tracking_enabled { "on" } else { "off" }
        );

        let state = Self {
            db,
            config: Arc::new(config),
            bot: Arc::new(Mutex::new(bot)),
            poll_guard: Arc::new(Mutex::new(())),
            source,
            scheduler: Arc::new(Mutex::new(None)),
        };

        {
            let mut bot = state.bot.lock().await;
            state.persist(&mut bot).await;
        }

        Ok(state)
    }

    /// Writes the bot state to the database.
    ///
    /// A failed write is logged and leaves the state marked dirty so the next caller
    /// retries; in-memory state stays authoritative.
    ///
    /// # Returns
    /// - `true` - State written
    /// - `false` - Write failed
    pub async fn persist(&self, bot: &mut BotState) -> bool {
        match StateRepository::new(&self.db).save(bot).await {
            Ok(()) => {
                bot.dirty = false;
                true
            }
            Err(e) => {
                tracing::error!("Failed to persist bot state: {}", e);
                bot.dirty = true;
                false
            }
        }
    }

    /// Stops the scheduler and flushes state one last time.
    pub async fn teardown(&self) {
        if let Some(mut scheduler) = self.scheduler.lock().await.take() {
            if let Err(e) = scheduler.shutdown().await {
                tracing::warn!("Failed to stop poll scheduler: {}", e);
            }
        }

        let mut bot = self.bot.lock().await;
        if self.persist(&mut bot).await {
            tracing::info!("Bot state saved");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::fake::StaticSource,
        model::{bot_state::PersistentKind, tracked::EntityRef},
    };

    #[tokio::test]
    async fn seeds_watch_lists_and_persists_them() -> Result<(), AppError> {
        let state = fixture::state(
            Arc::new(StaticSource::new()),
            &[
                ("WATCH_CLAN_NAME", "Foo,Bar"),
                ("WATCH_PLAYER_IDS", "76561198000000001"),
                ("LEADERBOARD_MESSAGE_ID", "99"),
            ],
        )
        .await;

        let stored = StateRepository::new(&state.db).load().await?;

        assert_eq!(stored.tracked.len(), 3);
        assert!(stored.tracked.contains_key(&EntityRef::clan("foo")));
        assert_eq!(stored.messages.get(PersistentKind::Leaderboard), Some(99));
        assert_eq!(stored.tracking_enabled, Some(false));

        Ok(())
    }

    #[tokio::test]
    async fn stored_toggle_wins_over_environment() -> Result<(), AppError> {
        let state = fixture::state(Arc::new(StaticSource::new()), &[]).await;

        let reloaded = AppState::init(
            state.db.clone(),
            fixture::config(&[("TRACKING_ENABLED", "true")]),
            Arc::new(StaticSource::new()),
        )
        .await?;

        assert!(!reloaded.bot.lock().await.tracking_enabled);

        Ok(())
    }
}
