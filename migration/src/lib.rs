pub use sea_orm_migration::prelude::*;

mod m20251201_000001_create_tracked_entity_table;
mod m20251201_000002_create_metric_snapshot_table;
mod m20251201_000003_create_leader_snapshot_table;
mod m20251201_000004_create_metric_history_table;
mod m20251201_000005_create_user_link_table;
mod m20251201_000006_create_bot_setting_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251201_000001_create_tracked_entity_table::Migration),
            Box::new(m20251201_000002_create_metric_snapshot_table::Migration),
            Box::new(m20251201_000003_create_leader_snapshot_table::Migration),
            Box::new(m20251201_000004_create_metric_history_table::Migration),
            Box::new(m20251201_000005_create_user_link_table::Migration),
            Box::new(m20251201_000006_create_bot_setting_table::Migration),
        ]
    }
}
