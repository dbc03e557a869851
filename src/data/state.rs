//! Whole-state persistence.
//!
//! The bot keeps its working state in memory and writes it back after every poll cycle
//! and state-changing command. `save` rewrites trackers, snapshots and settings inside a
//! single transaction so a crash never leaves a half-written snapshot behind.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::BTreeMap;

use crate::{
    data::{
        setting::{SettingRepository, LAST_CYCLE_KEY, TRACKING_ENABLED_KEY},
        snapshot::SnapshotRepository,
        tracked_entity::TrackedEntityRepository,
    },
    error::AppError,
    model::{
        bot_state::{BotState, PersistentKind, PersistentMessages},
        snapshot::Snapshot,
        tracked::{EntityRef, TrackedEntity},
    },
};

/// State read back from the database on startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredState {
    /// `None` until the toggle has been written once.
    pub tracking_enabled: Option<bool>,
    pub tracked: BTreeMap<EntityRef, TrackedEntity>,
    pub snapshot: Snapshot,
    pub messages: PersistentMessages,
}

pub struct StateRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StateRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every persisted part of the bot state.
    ///
    /// Unparseable settings are logged and skipped rather than failing startup.
    ///
    /// # Returns
    /// - `Ok(StoredState)` - Loaded state, empty on a fresh database
    /// - `Err(AppError)` - Database error or a corrupt tracker/snapshot row
    pub async fn load(&self) -> Result<StoredState, AppError> {
        let tracked = TrackedEntityRepository::new(self.db)
            .get_all()
            .await?
            .into_iter()
            .map(|tracked| (tracked.entity.clone(), tracked))
            .collect();

        let snapshot_repo = SnapshotRepository::new(self.db);
        let entities = snapshot_repo.load_entities().await?;
        let leaders = snapshot_repo.load_leaders().await?;

        let settings = SettingRepository::new(self.db).get_all().await?;

        let tracking_enabled = settings
            .get(TRACKING_ENABLED_KEY)
            .and_then(|value| match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                other => {
                    tracing::warn!("Ignoring stored tracking toggle '{}'", other);
                    None
                }
            });

        let taken_at = settings.get(LAST_CYCLE_KEY).and_then(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|time| time.with_timezone(&Utc))
                .map_err(|e| tracing::warn!("Ignoring stored cycle time '{}': {}", value, e))
                .ok()
        });

        let mut messages = PersistentMessages::default();
        for kind in PersistentKind::ALL {
            if let Some(value) = settings.get(&kind.setting_key()) {
                match value.parse::<u64>() {
                    Ok(id) => messages.set(kind, id),
                    Err(e) => tracing::warn!("Ignoring stored {} message id '{}': {}", kind, value, e),
                }
            }
        }

        Ok(StoredState {
            tracking_enabled,
            tracked,
            snapshot: Snapshot {
                entities,
                leaders,
                taken_at,
            },
            messages,
        })
    }

    /// Writes the whole bot state in one transaction.
    ///
    /// # Arguments
    /// - `state` - Current in-memory state
    ///
    /// # Returns
    /// - `Ok(())` - Transaction committed
    /// - `Err(AppError::DbErr)` - Any write failed; the transaction is rolled back
    pub async fn save(&self, state: &BotState) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        TrackedEntityRepository::new(&txn)
            .replace_all(state.tracked.values())
            .await?;

        let snapshot_repo = SnapshotRepository::new(&txn);
        snapshot_repo
            .replace_entities(&state.snapshot.entities)
            .await?;
        snapshot_repo
            .replace_leaders(
                &state.snapshot.leaders,
                state.snapshot.taken_at.unwrap_or_else(Utc::now),
            )
            .await?;

        let settings = SettingRepository::new(&txn);
        settings
            .set(TRACKING_ENABLED_KEY, &state.tracking_enabled.to_string())
            .await?;
        match state.snapshot.taken_at {
            Some(taken_at) => settings.set(LAST_CYCLE_KEY, &taken_at.to_rfc3339()).await?,
            None => {
                settings.delete(LAST_CYCLE_KEY).await?;
            }
        }
        for kind in PersistentKind::ALL {
            match state.messages.get(kind) {
                Some(id) => settings.set(&kind.setting_key(), &id.to_string()).await?,
                None => {
                    settings.delete(&kind.setting_key()).await?;
                }
            }
        }

        txn.commit().await?;

        Ok(())
    }
}
