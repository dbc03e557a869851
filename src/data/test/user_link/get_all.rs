use super::*;

/// Tests listing links with numeric Discord ids.
///
/// Expected: Ok with links in creation order
#[tokio::test]
async fn lists_links() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_user_link(db, "10", "76561198000000001").await?;
    create_user_link(db, "20", "76561198000000002").await?;

    let links = UserLinkRepository::new(db).get_all().await?;

    assert_eq!(
        links,
        vec![
            (10, "76561198000000001".to_string()),
            (20, "76561198000000002".to_string())
        ]
    );

    Ok(())
}

/// Tests that a corrupt Discord id is reported.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_non_numeric_discord_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_user_link(db, "not-a-number", "76561198000000001").await?;

    let result = UserLinkRepository::new(db).get_all().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
