use super::*;

/// Tests looking up a user without a link.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_when_unlinked() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_user_link(db, "1", "76561198000000001").await?;

    let steam = UserLinkRepository::new(db).find_steam_id(2).await?;

    assert_eq!(steam, None);

    Ok(())
}
