use super::*;

/// Tests that only rows of the metric inside the window are returned, oldest first.
///
/// Expected: Ok with two rows in time order
#[tokio::test]
async fn filters_by_metric_and_cutoff() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MetricHistory)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    create_history_row(db, "pvp_kills", "Walobots", 30.0, now - Duration::hours(1)).await?;
    create_history_row(db, "pvp_kills", "Walobots", 10.0, now - Duration::hours(11)).await?;
    create_history_row(db, "pvp_kills", "Walobots", 1.0, now - Duration::hours(13)).await?;
    create_history_row(db, "looted_hackable", "Walobots", 5.0, now).await?;

    let points = HistoryRepository::new(db)
        .since("pvp_kills", now - Duration::hours(12))
        .await?;

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, 10.0);
    assert_eq!(points[1].value, 30.0);

    Ok(())
}
