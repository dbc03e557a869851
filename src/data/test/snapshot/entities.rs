use super::*;

/// Tests grouping snapshot rows by entity.
///
/// Verifies that rows of the same entity end up in one snapshot and that its
/// observation time is the latest row time.
///
/// Expected: Ok with two entities
#[tokio::test]
async fn groups_rows_by_entity() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MetricSnapshot)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let latest = Utc::now();
    create_metric_snapshot(db, "walobots", "pvp", "kill_player", 10.0).await?;
    MetricSnapshotFactory::new(db, "walobots")
        .metric("pvp", "death_player")
        .value(4.0)
        .observed_at(latest + Duration::seconds(5))
        .build()
        .await?;
    MetricSnapshotFactory::new(db, "76561198000000001")
        .kind("player")
        .value(3.0)
        .build()
        .await?;

    let entities = SnapshotRepository::new(db).load_entities().await?;

    assert_eq!(entities.len(), 2);
    let clan = &entities[&EntityRef::clan("walobots")];
    assert_eq!(clan.values[&MetricId::new("pvp", "kill_player")], 10.0);
    assert_eq!(clan.values[&MetricId::new("pvp", "death_player")], 4.0);
    assert!(clan.observed_at >= latest + Duration::seconds(4));
    let player = &entities[&EntityRef::player("76561198000000001")];
    assert_eq!(player.values.len(), 1);

    Ok(())
}

/// Tests that replacing entity values drops stale rows.
///
/// Expected: Ok with one row per stored value
#[tokio::test]
async fn replaces_entity_values() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MetricSnapshot)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_metric_snapshot(db, "gone", "pvp", "kill_player", 99.0).await?;

    let mut entities = BTreeMap::new();
    entities.insert(
        EntityRef::clan("Walobots"),
        EntitySnapshot {
            values: [
                (MetricId::new("pvp", "kill_player"), 14.0),
                (MetricId::new("looted", "looted_crate"), 3.0),
            ]
            .into(),
            observed_at: Utc::now(),
        },
    );

    let repo = SnapshotRepository::new(db);
    repo.replace_entities(&entities).await?;

    let count = entity::prelude::MetricSnapshot::find().count(db).await?;
    assert_eq!(count, 2);

    let loaded = repo.load_entities().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded[&EntityRef::clan("walobots")].values[&MetricId::new("pvp", "kill_player")],
        14.0
    );

    Ok(())
}
