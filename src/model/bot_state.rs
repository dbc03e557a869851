//! In-memory bot state shared by the poll job and command handlers.

use std::{collections::BTreeMap, fmt};

use crate::{
    config::{Config, MessageIdConfig},
    model::{
        snapshot::Snapshot,
        tracked::{EntityKind, EntityRef, TrackedEntity},
    },
};

/// Embeds the bot keeps one message for and edits in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PersistentKind {
    Help,
    Status,
    Trend,
    Leaderboard,
}

impl PersistentKind {
    pub const ALL: [PersistentKind; 4] = [
        PersistentKind::Help,
        PersistentKind::Status,
        PersistentKind::Trend,
        PersistentKind::Leaderboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistentKind::Help => "help",
            PersistentKind::Status => "status",
            PersistentKind::Trend => "trend",
            PersistentKind::Leaderboard => "leaderboard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Key of the `bot_setting` row holding the message id.
    pub fn setting_key(&self) -> String {
        format!("message.{}", self.as_str())
    }
}

impl fmt::Display for PersistentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message ids of the persistent embeds in the alert channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistentMessages {
    ids: BTreeMap<PersistentKind, u64>,
}

impl PersistentMessages {
    pub fn get(&self, kind: PersistentKind) -> Option<u64> {
        self.ids.get(&kind).copied()
    }

    pub fn set(&mut self, kind: PersistentKind, message_id: u64) {
        self.ids.insert(kind, message_id);
    }

    pub fn clear(&mut self, kind: PersistentKind) {
        self.ids.remove(&kind);
    }

    /// Ids that `clear` must never delete.
    pub fn keep_ids(&self) -> Vec<u64> {
        self.ids.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersistentKind, u64)> + '_ {
        self.ids.iter().map(|(kind, id)| (*kind, *id))
    }

    /// Fills ids missing from storage with the ones configured in the environment.
    pub fn fill_from_config(&mut self, config: &MessageIdConfig) {
        let configured = [
            (PersistentKind::Leaderboard, config.leaderboard),
            (PersistentKind::Trend, config.trend),
            (PersistentKind::Help, config.help),
            (PersistentKind::Status, config.status),
        ];
        for (kind, id) in configured {
            if let Some(id) = id {
                self.ids.entry(kind).or_insert(id);
            }
        }
    }
}

/// Mutable state guarded by the application's state mutex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotState {
    pub tracking_enabled: bool,
    pub tracked: BTreeMap<EntityRef, TrackedEntity>,
    pub snapshot: Snapshot,
    pub messages: PersistentMessages,
    /// Set when the last flush to SQLite failed.
    pub dirty: bool,
}

impl BotState {
    /// Adds a tracker or replaces the settings of an existing one.
    ///
    /// The snapshot of a replaced tracker is kept so re-tracking does not re-baseline.
    ///
    /// # Returns
    /// - `true` - Entity was not tracked before
    /// - `false` - Existing tracker was updated
    pub fn track(&mut self, tracked: TrackedEntity) -> bool {
        match self.tracked.get_mut(&tracked.entity) {
            Some(existing) => {
                existing.display_name = tracked.display_name;
                existing.clan_label = tracked.clan_label;
                existing.metrics = tracked.metrics;
                false
            }
            None => {
                self.tracked.insert(tracked.entity.clone(), tracked);
                true
            }
        }
    }

    /// Removes a tracker together with its snapshot entry.
    ///
    /// # Returns
    /// - `Some(TrackedEntity)` - The removed tracker
    /// - `None` - Entity was not tracked
    pub fn untrack(&mut self, entity: &EntityRef) -> Option<TrackedEntity> {
        let removed = self.tracked.remove(entity)?;
        self.snapshot.entities.remove(entity);
        Some(removed)
    }

    pub fn tracked_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &TrackedEntity> {
        self.tracked.values().filter(move |t| t.entity.kind == kind)
    }

    pub fn has_players(&self) -> bool {
        self.tracked_of_kind(EntityKind::Player).next().is_some()
    }

    /// Adds trackers from the watch lists in the environment.
    ///
    /// Entities already tracked are left untouched, so seeding on every start is safe.
    ///
    /// # Returns
    /// - `usize` - Number of trackers added
    pub fn seed_from_config(&mut self, config: &Config) -> usize {
        let mut added = 0;

        for clan in &config.watch_clans {
            if !self.tracked.contains_key(&EntityRef::clan(clan)) {
                self.tracked
                    .insert(EntityRef::clan(clan), TrackedEntity::clan(clan, Vec::new()));
                added += 1;
            }
        }

        let players = config
            .watch_players
            .iter()
            .map(|steam| (steam.as_str(), None))
            .chain(
                config
                    .player_clan_overrides
                    .iter()
                    .map(|(steam, clan)| (steam.as_str(), Some(clan.clone()))),
            );

        for (steam, label) in players {
            let entity = EntityRef::player(steam);
            match self.tracked.get_mut(&entity) {
                Some(existing) => {
                    if existing.clan_label.is_none() && label.is_some() {
                        existing.clan_label = label;
                    }
                }
                None => {
                    self.tracked
                        .insert(entity, TrackedEntity::player(steam, label));
                    added += 1;
                }
            }
        }

        added
    }
}
