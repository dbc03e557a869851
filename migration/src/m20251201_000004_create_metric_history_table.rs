use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(MetricHistory::Id))
                    .col(string(MetricHistory::MetricKey))
                    .col(string(MetricHistory::ClanName))
                    .col(integer_null(MetricHistory::Rank))
                    .col(double(MetricHistory::Value))
                    .col(timestamp_with_time_zone(MetricHistory::RecordedAt))
                    .to_owned(),
            )
            .await?;

        // Trend queries filter by metric and time window
        manager
            .create_index(
                Index::create()
                    .name("idx_metric_history_metric_recorded_at")
                    .table(MetricHistory::Table)
                    .col(MetricHistory::MetricKey)
                    .col(MetricHistory::RecordedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_metric_history_metric_recorded_at")
                    .table(MetricHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MetricHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MetricHistory {
    Table,
    Id,
    MetricKey,
    ClanName,
    Rank,
    Value,
    RecordedAt,
}
