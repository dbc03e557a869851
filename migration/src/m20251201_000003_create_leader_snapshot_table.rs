use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeaderSnapshot::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaderSnapshot::Id))
                    .col(string(LeaderSnapshot::MetricKey))
                    .col(string(LeaderSnapshot::ClanName))
                    .col(double(LeaderSnapshot::Value))
                    .col(timestamp_with_time_zone(LeaderSnapshot::ObservedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaderSnapshot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LeaderSnapshot {
    Table,
    Id,
    MetricKey,
    ClanName,
    Value,
    ObservedAt,
}
