use super::*;

/// Tests that reading an unknown key returns nothing.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_key() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BotSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let value = SettingRepository::new(db).get("tracking_enabled").await?;

    assert_eq!(value, None);

    Ok(())
}

/// Tests that setting a key twice overwrites the value.
///
/// Expected: Ok with the latest value stored once
#[tokio::test]
async fn overwrites_existing_value() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BotSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingRepository::new(db);
    repo.set("tracking_enabled", "false").await?;
    repo.set("tracking_enabled", "true").await?;
    repo.set("message.trend", "42").await?;

    assert_eq!(repo.get("tracking_enabled").await?.as_deref(), Some("true"));

    let all = repo.get_all().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all["message.trend"], "42");

    Ok(())
}
