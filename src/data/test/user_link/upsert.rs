use super::*;

/// Tests that linking again replaces the previous SteamID.
///
/// Expected: Ok with a single row holding the new SteamID
#[tokio::test]
async fn replaces_existing_link() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserLinkRepository::new(db);
    repo.upsert(1234, "76561198000000001").await?;
    repo.upsert(1234, "76561198000000002").await?;

    let count = entity::prelude::UserLink::find().count(db).await?;
    assert_eq!(count, 1);
    assert_eq!(
        repo.find_steam_id(1234).await?.as_deref(),
        Some("76561198000000002")
    );

    Ok(())
}
