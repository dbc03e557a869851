use super::*;

/// Tests deleting present and absent keys.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn reports_whether_key_existed() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BotSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingRepository::new(db);
    repo.set("message.help", "1").await?;

    assert!(repo.delete("message.help").await?);
    assert!(!repo.delete("message.help").await?);
    assert_eq!(repo.get("message.help").await?, None);

    Ok(())
}
