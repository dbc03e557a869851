use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "metric_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub metric_key: String,
    pub clan_name: String,
    pub rank: Option<i32>,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
