use super::*;

/// Tests appending a cycle's history rows.
///
/// Expected: Ok with every row stored and rank preserved
#[tokio::test]
async fn appends_points() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::MetricHistory)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let points: Vec<HistoryPoint> = ["Walobots", "Rivals"]
        .iter()
        .enumerate()
        .map(|(i, clan)| HistoryPoint {
            metric_key: "pvp_kills".to_string(),
            clan_name: clan.to_string(),
            rank: Some(i as i64 + 1),
            value: 100.0 - i as f64,
            recorded_at: now,
        })
        .collect();

    let repo = HistoryRepository::new(db);
    let written = repo.append(&points).await?;

    assert_eq!(written, 2);
    let stored = repo.since("pvp_kills", now - Duration::minutes(1)).await?;
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|p| p.clan_name == "Rivals" && p.rank == Some(2)));

    Ok(())
}
