use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BotSetting::Table)
                    .if_not_exists()
                    .col(string(BotSetting::Key).primary_key())
                    .col(string(BotSetting::Value))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BotSetting::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BotSetting {
    Table,
    Key,
    Value,
}
