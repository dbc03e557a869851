use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricSnapshot::Table)
                    .if_not_exists()
                    .col(pk_auto(MetricSnapshot::Id))
                    .col(string(MetricSnapshot::Kind))
                    .col(string(MetricSnapshot::Identifier))
                    .col(string(MetricSnapshot::MetricGroup))
                    .col(string(MetricSnapshot::Stat))
                    .col(double(MetricSnapshot::Value))
                    .col(timestamp_with_time_zone(MetricSnapshot::ObservedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metric_snapshot_entity_metric")
                    .table(MetricSnapshot::Table)
                    .col(MetricSnapshot::Kind)
                    .col(MetricSnapshot::Identifier)
                    .col(MetricSnapshot::MetricGroup)
                    .col(MetricSnapshot::Stat)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_metric_snapshot_entity_metric")
                    .table(MetricSnapshot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MetricSnapshot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MetricSnapshot {
    Table,
    Id,
    Kind,
    Identifier,
    MetricGroup,
    Stat,
    Value,
    ObservedAt,
}
