//! One poll cycle: fetch every table, diff against the snapshot, alert, refresh embeds.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::{
    data::history::HistoryRepository,
    error::AppError,
    model::{
        alert::AlertEvent,
        bot_state::PersistentKind,
        history::HistoryPoint,
        leaderboard::{LeaderboardRow, TableQuery},
        metric::{self, Metric, DISPLAY_METRICS, METRICS},
        tracked::EntityKind,
    },
    service::{
        delta::{collect_observations, evaluate, evaluate_leaders, DeltaRule},
        embed,
        notifier::{Notifier, OutgoingMessage},
        persistent::PersistentEmbedService,
    },
    state::AppState,
};

/// History rows older than this are pruned after every cycle.
pub const HISTORY_RETENTION_HOURS: i64 = 48;

/// Counters logged at the end of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub tables_fetched: usize,
    pub alerts_sent: usize,
    /// Alerts produced while tracking was toggled off.
    pub alerts_suppressed: usize,
    pub history_rows: usize,
}

struct FetchedTable {
    query: TableQuery,
    metric: &'static Metric,
    rows: Vec<LeaderboardRow>,
}

pub struct PollService<'a> {
    state: &'a AppState,
    notifier: &'a dyn Notifier,
}

impl<'a> PollService<'a> {
    pub fn new(state: &'a AppState, notifier: &'a dyn Notifier) -> Self {
        Self { state, notifier }
    }

    /// Runs one poll cycle.
    ///
    /// Every catalog clan table is fetched, plus one player table per group while any
    /// player is tracked. If any fetch fails the cycle stops before touching the
    /// snapshot. Otherwise deltas are evaluated, the new snapshot is persisted, alerts
    /// are sent (unless tracking is off) and the persistent embeds are refreshed.
    ///
    /// # Returns
    /// - `Ok(CycleReport)` - Cycle completed; alert and embed send failures are logged only
    /// - `Err(AppError::ApiErr)` - A table could not be fetched; nothing was changed
    pub async fn run_cycle(&self) -> Result<CycleReport, AppError> {
        let config = &self.state.config;
        let (tracked, has_players) = {
            let bot = self.state.bot.lock().await;
            (bot.tracked.clone(), bot.has_players())
        };

        let tables = self.fetch_tables(has_players).await?;
        let now = Utc::now();

        let mut observations = BTreeMap::new();
        for table in &tables {
            collect_observations(
                &mut observations,
                &tracked,
                table.query.kind,
                &table.query.group,
                &table.query.sort_by,
                &table.rows,
            );
        }

        let (alerts, history, tracking_enabled) = {
            let mut bot = self.state.bot.lock().await;

            let evaluation = evaluate(
                &observations,
                &bot.snapshot.entities,
                &bot.tracked,
                &DeltaRule::default(),
                now,
            );
            let mut alerts: Vec<AlertEvent> = evaluation.alerts;
            let mut leaders = BTreeMap::new();
            let mut history = Vec::new();

            for table in tables.iter().filter(|t| t.query.kind == EntityKind::Clan) {
                let result = evaluate_leaders(
                    table.metric,
                    &table.rows,
                    &bot.snapshot.leaders,
                    &config.clan_name,
                    now,
                );
                alerts.extend(result.alerts);
                leaders.extend(result.leaders);
                history.extend(result.history);
            }

            bot.snapshot.entities = evaluation.entities;
            bot.snapshot.leaders = leaders;
            bot.snapshot.taken_at = Some(now);
            self.state.persist(&mut bot).await;

            (alerts, history, bot.tracking_enabled)
        };

        let mut report = CycleReport {
            tables_fetched: tables.len(),
            history_rows: self.record_history(&history, now).await,
            ..Default::default()
        };

        if tracking_enabled {
            for alert in &alerts {
                let text = embed::alert_text(alert, config.alert_role_id);
                match self
                    .notifier
                    .send(config.channel_id, OutgoingMessage::text(text))
                    .await
                {
                    Ok(_) => report.alerts_sent += 1,
                    Err(e) => tracing::error!(
                        "Failed to send {:?} alert for {}: {}",
                        alert.kind,
                        alert.display_name,
                        e
                    ),
                }
            }
        } else {
            report.alerts_suppressed = alerts.len();
        }

        let display: BTreeMap<&str, Vec<LeaderboardRow>> = tables
            .iter()
            .filter(|t| t.query.kind == EntityKind::Clan && DISPLAY_METRICS.contains(&t.metric.key))
            .map(|t| (t.metric.key, t.rows.clone()))
            .collect();
        self.refresh_embeds(&display, now).await;

        Ok(report)
    }

    async fn fetch_tables(&self, include_players: bool) -> Result<Vec<FetchedTable>, AppError> {
        let mut queries: Vec<(TableQuery, &'static Metric)> = METRICS
            .iter()
            .map(|metric| (TableQuery::clan(metric), metric))
            .collect();
        if include_players {
            queries.extend(
                metric::groups()
                    .into_iter()
                    .map(|metric| (TableQuery::player(metric), metric)),
            );
        }

        let mut tables = Vec::with_capacity(queries.len());
        for (query, metric) in queries {
            let rows = self.state.source.fetch_table(&query).await.map_err(|e| {
                tracing::warn!(
                    "Fetching {} table {}/{} failed: {}",
                    query.kind,
                    query.group,
                    query.sort_by,
                    e
                );
                e
            })?;
            tables.push(FetchedTable {
                query,
                metric,
                rows,
            });
        }

        Ok(tables)
    }

    async fn record_history(
        &self,
        history: &[HistoryPoint],
        now: DateTime<Utc>,
    ) -> usize {
        let repo = HistoryRepository::new(&self.state.db);

        let written = match repo.append(history).await {
            Ok(written) => written,
            Err(e) => {
                tracing::error!("Failed to record metric history: {}", e);
                0
            }
        };

        match repo
            .prune(now - Duration::hours(HISTORY_RETENTION_HOURS))
            .await
        {
            Ok(0) => {}
            Ok(pruned) => tracing::debug!("Pruned {} history rows", pruned),
            Err(e) => tracing::warn!("Failed to prune metric history: {}", e),
        }

        written
    }

    async fn refresh_embeds(
        &self,
        display: &BTreeMap<&str, Vec<LeaderboardRow>>,
        now: DateTime<Utc>,
    ) {
        let embeds = PersistentEmbedService::new(self.state, self.notifier);

        for (kind, post_if_missing) in [
            (PersistentKind::Leaderboard, true),
            (PersistentKind::Trend, true),
            (PersistentKind::Status, false),
        ] {
            let result = match embeds.build(kind, Some(display), now).await {
                Ok(embed) => embeds.publish(kind, embed, post_if_missing).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::error!("Failed to refresh {} embed: {}", kind, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::fake::{clan_row, player_row, StaticSource},
        data::state::StateRepository,
        model::tracked::EntityRef,
        service::notifier::recording::RecordingNotifier,
        state::fixture,
    };
    use std::sync::Arc;

    fn kills(source: &StaticSource, value: f64) {
        source.set_table(
            EntityKind::Clan,
            "pvp",
            "kill_player",
            vec![clan_row("Foo", 1, &[("kill_player", value)])],
        );
    }

    fn alert_texts(notifier: &RecordingNotifier) -> Vec<String> {
        notifier
            .texts()
            .into_iter()
            .filter(|text| text.contains("[WATCH]") || text.contains("[ROUND ENDED]"))
            .collect()
    }

    #[tokio::test]
    async fn first_cycle_only_stores_a_baseline() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 10.0);
        let state = fixture::state(
            source.clone(),
            &[("WATCH_CLAN_NAME", "Foo"), ("TRACKING_ENABLED", "true")],
        )
        .await;
        let notifier = RecordingNotifier::new();

        let report = PollService::new(&state, &notifier).run_cycle().await?;

        assert_eq!(report.tables_fetched, METRICS.len());
        assert_eq!(report.alerts_sent, 0);
        assert!(alert_texts(&notifier).is_empty());

        let bot = state.bot.lock().await;
        assert_eq!(
            bot.snapshot.value(&EntityRef::clan("Foo"), &metric::PVP_KILLS.id()),
            Some(10.0)
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_cycle_alerts_on_increase() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 10.0);
        let state = fixture::state(
            source.clone(),
            &[("WATCH_CLAN_NAME", "Foo"), ("TRACKING_ENABLED", "true")],
        )
        .await;
        let notifier = RecordingNotifier::new();
        let poll = PollService::new(&state, &notifier);

        poll.run_cycle().await?;
        kills(&source, 14.0);
        let report = poll.run_cycle().await?;

        assert_eq!(report.alerts_sent, 1);
        let texts = alert_texts(&notifier);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Clan `Foo`"));
        assert!(texts[0].contains("Δ +4 (now 14)"));

        Ok(())
    }

    #[tokio::test]
    async fn tracking_off_suppresses_alerts_but_refreshes_baseline() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 10.0);
        let state = fixture::state(source.clone(), &[("WATCH_CLAN_NAME", "Foo")]).await;
        let notifier = RecordingNotifier::new();
        let poll = PollService::new(&state, &notifier);

        poll.run_cycle().await?;
        kills(&source, 14.0);
        let report = poll.run_cycle().await?;

        assert_eq!(report.alerts_sent, 0);
        assert_eq!(report.alerts_suppressed, 1);
        assert!(alert_texts(&notifier).is_empty());
        assert_eq!(
            state
                .bot
                .lock()
                .await
                .snapshot
                .value(&EntityRef::clan("Foo"), &metric::PVP_KILLS.id()),
            Some(14.0)
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_leaves_snapshot_untouched() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 10.0);
        let state = fixture::state(
            source.clone(),
            &[("WATCH_CLAN_NAME", "Foo"), ("TRACKING_ENABLED", "true")],
        )
        .await;
        let notifier = RecordingNotifier::new();
        let poll = PollService::new(&state, &notifier);

        poll.run_cycle().await?;
        let before = state.bot.lock().await.snapshot.clone();

        kills(&source, 20.0);
        source.fail_table(EntityKind::Clan, "looted", "looted_crate");
        assert!(poll.run_cycle().await.is_err());

        assert_eq!(state.bot.lock().await.snapshot, before);
        assert!(alert_texts(&notifier).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn decrease_reports_round_end_and_rebaselines() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 50.0);
        let state = fixture::state(
            source.clone(),
            &[("WATCH_CLAN_NAME", "Foo"), ("TRACKING_ENABLED", "true")],
        )
        .await;
        let notifier = RecordingNotifier::new();
        let poll = PollService::new(&state, &notifier);

        poll.run_cycle().await?;
        kills(&source, 3.0);
        poll.run_cycle().await?;

        let texts = alert_texts(&notifier);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("[ROUND ENDED]"));

        let stored = StateRepository::new(&state.db).load().await?;
        assert_eq!(
            stored
                .snapshot
                .value(&EntityRef::clan("Foo"), &metric::PVP_KILLS.id()),
            Some(3.0)
        );

        Ok(())
    }

    #[tokio::test]
    async fn player_tables_are_only_fetched_when_players_are_tracked() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        source.set_table(
            EntityKind::Player,
            "pvp",
            "kill_player",
            vec![player_row("76561198000000001", "bob", 1, &[("kill_player", 2.0)])],
        );
        let state = fixture::state(
            source.clone(),
            &[("WATCH_PLAYER_IDS", "76561198000000001")],
        )
        .await;
        let notifier = RecordingNotifier::new();

        let report = PollService::new(&state, &notifier).run_cycle().await?;

        assert_eq!(report.tables_fetched, METRICS.len() + metric::groups().len());
        let bot = state.bot.lock().await;
        assert_eq!(
            bot.snapshot.value(
                &EntityRef::player("76561198000000001"),
                &metric::PVP_KILLS.id()
            ),
            Some(2.0)
        );

        Ok(())
    }

    #[tokio::test]
    async fn posts_leaderboard_and_trend_embeds_once() -> Result<(), AppError> {
        let source = Arc::new(StaticSource::new());
        kills(&source, 10.0);
        let state = fixture::state(source.clone(), &[]).await;
        let notifier = RecordingNotifier::new();
        let poll = PollService::new(&state, &notifier);

        poll.run_cycle().await?;
        poll.run_cycle().await?;

        assert_eq!(notifier.remaining().len(), 2);
        assert_eq!(notifier.edits.lock().unwrap().len(), 2);
        let bot = state.bot.lock().await;
        assert!(bot.messages.get(PersistentKind::Leaderboard).is_some());
        assert!(bot.messages.get(PersistentKind::Trend).is_some());
        assert!(bot.messages.get(PersistentKind::Status).is_none());

        Ok(())
    }
}
