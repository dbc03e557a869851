use super::*;

/// Tests pruning rows older than the retention cutoff.
///
/// Expected: Ok(1) with the recent row kept
#[tokio::test]
async fn deletes_rows_before_cutoff() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MetricHistory)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    create_history_row(db, "pvp_kills", "Walobots", 1.0, now - Duration::hours(49)).await?;
    create_history_row(db, "pvp_kills", "Walobots", 2.0, now - Duration::hours(2)).await?;

    let deleted = HistoryRepository::new(db)
        .prune(now - Duration::hours(48))
        .await?;

    assert_eq!(deleted, 1);
    let count = entity::prelude::MetricHistory::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}
