use super::*;

/// Tests that replacing trackers drops rows that are no longer tracked.
///
/// Expected: Ok with only the new trackers stored
#[tokio::test]
async fn replaces_previous_rows() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedEntity)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedEntityFactory::new(db).clan("Old Clan").build().await?;

    let repo = TrackedEntityRepository::new(db);
    let new = vec![
        TrackedEntity::clan("Rivals", vec!["kill_player".to_string()]),
        TrackedEntity::player("76561198000000002", Some("Rivals".to_string())),
    ];
    repo.replace_all(new.iter()).await?;

    let count = entity::prelude::TrackedEntity::find().count(db).await?;
    assert_eq!(count, 2);

    let stored = repo.get_all().await?;
    assert_eq!(stored[0].entity, EntityRef::clan("rivals"));
    assert_eq!(stored[0].metrics_column(), "kill_player");
    assert_eq!(stored[1].clan_label.as_deref(), Some("Rivals"));

    Ok(())
}

/// Tests replacing with an empty set.
///
/// Expected: Ok with the table emptied
#[tokio::test]
async fn clears_table_when_empty() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedEntity)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedEntityFactory::new(db).build().await?;

    TrackedEntityRepository::new(db)
        .replace_all(Vec::<&TrackedEntity>::new())
        .await?;

    let count = entity::prelude::TrackedEntity::find().count(db).await?;
    assert_eq!(count, 0);

    Ok(())
}
