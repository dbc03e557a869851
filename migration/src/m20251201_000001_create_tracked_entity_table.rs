use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrackedEntity::Table)
                    .if_not_exists()
                    .col(pk_auto(TrackedEntity::Id))
                    .col(string(TrackedEntity::Kind))
                    .col(string(TrackedEntity::Identifier))
                    .col(string(TrackedEntity::DisplayName))
                    .col(string_null(TrackedEntity::ClanLabel))
                    .col(string(TrackedEntity::Metrics).default(""))
                    .col(timestamp_with_time_zone(TrackedEntity::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // One tracker per (kind, identifier)
        manager
            .create_index(
                Index::create()
                    .name("idx_tracked_entity_kind_identifier")
                    .table(TrackedEntity::Table)
                    .col(TrackedEntity::Kind)
                    .col(TrackedEntity::Identifier)
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
                    .name("idx_tracked_entity_kind_identifier")
                    .table(TrackedEntity::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TrackedEntity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrackedEntity {
    Table,
    Id,
    Kind,
    Identifier,
    DisplayName,
    ClanLabel,
    Metrics,
    CreatedAt,
}
