use super::*;

/// Tests loading trackers written by the factory.
///
/// Expected: Ok with both rows converted to domain models in insertion order
#[tokio::test]
async fn loads_clans_and_players() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedEntity)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedEntityFactory::new(db)
        .clan("Walobots")
        .metrics(&["kill_player"])
        .build()
        .await?;
    TrackedEntityFactory::new(db)
        .player("76561198000000001")
        .clan_label("Walobots")
        .build()
        .await?;

    let tracked = TrackedEntityRepository::new(db).get_all().await?;

    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[0].entity, EntityRef::clan("Walobots"));
    assert_eq!(tracked[0].display_name, "Walobots");
    assert!(tracked[0].watches("kill_player"));
    assert!(!tracked[0].watches("death_player"));
    assert_eq!(tracked[1].entity.kind, EntityKind::Player);
    assert_eq!(tracked[1].clan_label.as_deref(), Some("Walobots"));

    Ok(())
}

/// Tests that a row with an unknown kind is reported instead of skipped.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_unknown_kind() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedEntity)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = TrackedEntityFactory::new(db).build().await?;
    let mut active: entity::tracked_entity::ActiveModel = row.into();
    active.kind = sea_orm::ActiveValue::Set("guild".to_string());
    sea_orm::ActiveModelTrait::update(active, db).await?;

    let result = TrackedEntityRepository::new(db).get_all().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}

/// Tests loading from an empty table.
///
/// Expected: Ok with no trackers
#[tokio::test]
async fn returns_empty_for_fresh_database() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedEntity)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let tracked = TrackedEntityRepository::new(db).get_all().await?;

    assert!(tracked.is_empty());

    Ok(())
}
