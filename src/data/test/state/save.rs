use super::*;

fn sample_state() -> BotState {
    let mut state = BotState {
        tracking_enabled: true,
        ..Default::default()
    };
    state.track(TrackedEntity::clan("Walobots", vec!["kill_player".to_string()]));
    state.track(TrackedEntity::player(
        "76561198000000001",
        Some("Walobots".to_string()),
    ));
    state.snapshot.entities.insert(
        EntityRef::clan("Walobots"),
        EntitySnapshot {
            values: [(MetricId::new("pvp", "kill_player"), 10.0)].into(),
            observed_at: Utc::now(),
        },
    );
    state.snapshot.leaders.insert(
        ("gathered_sulfur_ore".to_string(), "Rivals".to_string()),
        12000.0,
    );
    state.snapshot.taken_at = Some(Utc::now());
    state.messages.set(PersistentKind::Leaderboard, 555);
    state
}

/// Tests that a saved state is read back unchanged, as after a restart.
///
/// Expected: Ok with trackers, snapshot, toggle and message ids restored
#[tokio::test]
async fn round_trips_state_across_restart() -> Result<(), AppError> {
    let test = TestBuilder::new().with_state_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let state = sample_state();
    StateRepository::new(db).save(&state).await?;

    let stored = StateRepository::new(db).load().await?;

    assert_eq!(stored.tracking_enabled, Some(true));
    assert_eq!(stored.tracked.len(), 2);
    assert_eq!(
        stored.tracked[&EntityRef::player("76561198000000001")]
            .clan_label
            .as_deref(),
        Some("Walobots")
    );
    assert_eq!(
        stored
            .snapshot
            .value(&EntityRef::clan("walobots"), &MetricId::new("pvp", "kill_player")),
        Some(10.0)
    );
    assert_eq!(stored.snapshot.leaders.len(), 1);
    assert!(stored.snapshot.taken_at.is_some());
    assert_eq!(stored.messages.get(PersistentKind::Leaderboard), Some(555));

    Ok(())
}

/// Tests that a later save removes what the state no longer holds.
///
/// Expected: Ok with the untracked clan, its snapshot and the cleared message id gone
#[tokio::test]
async fn later_save_drops_removed_entries() -> Result<(), AppError> {
    let test = TestBuilder::new().with_state_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = StateRepository::new(db);
    let mut state = sample_state();
    repo.save(&state).await?;

    state.untrack(&EntityRef::clan("Walobots"));
    state.messages.clear(PersistentKind::Leaderboard);
    state.tracking_enabled = false;
    repo.save(&state).await?;

    let stored = repo.load().await?;

    assert_eq!(stored.tracking_enabled, Some(false));
    assert_eq!(stored.tracked.len(), 1);
    assert!(stored.snapshot.entities.is_empty());
    assert_eq!(stored.messages.get(PersistentKind::Leaderboard), None);

    Ok(())
}
