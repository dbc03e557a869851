use super::*;

/// Tests loading from a fresh database.
///
/// Expected: Ok with an empty state and no stored toggle
#[tokio::test]
async fn loads_empty_state() -> Result<(), AppError> {
    let test = TestBuilder::new().with_state_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = StateRepository::new(db).load().await?;

    assert_eq!(stored.tracking_enabled, None);
    assert!(stored.tracked.is_empty());
    assert!(stored.snapshot.entities.is_empty());
    assert_eq!(stored.snapshot.taken_at, None);

    Ok(())
}

/// Tests that malformed settings are skipped instead of failing the load.
///
/// Expected: Ok with only the valid message id kept
#[tokio::test]
async fn skips_malformed_settings() -> Result<(), AppError> {
    let test = TestBuilder::new().with_state_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let settings = SettingRepository::new(db);
    settings.set("tracking_enabled", "maybe").await?;
    settings.set("last_cycle_at", "yesterday").await?;
    settings.set("message.help", "abc").await?;
    settings.set("message.trend", "77").await?;

    let stored = StateRepository::new(db).load().await?;

    assert_eq!(stored.tracking_enabled, None);
    assert_eq!(stored.snapshot.taken_at, None);
    assert_eq!(stored.messages.get(PersistentKind::Help), None);
    assert_eq!(stored.messages.get(PersistentKind::Trend), Some(77));

    Ok(())
}
