use super::*;

/// Tests storing and reading back leader values.
///
/// Expected: Ok with the second write replacing the first
#[tokio::test]
async fn replaces_and_loads_leaders() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::LeaderSnapshot)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SnapshotRepository::new(db);
    let key = ("gathered_sulfur_ore".to_string(), "Rivals".to_string());

    repo.replace_leaders(&[(key.clone(), 10000.0)].into(), Utc::now())
        .await?;
    repo.replace_leaders(
        &[
            (key.clone(), 16000.0),
            (("looted_hackable".to_string(), "Rivals".to_string()), 4.0),
        ]
        .into(),
        Utc::now(),
    )
    .await?;

    let leaders = repo.load_leaders().await?;

    assert_eq!(leaders.len(), 2);
    assert_eq!(leaders[&key], 16000.0);

    Ok(())
}
