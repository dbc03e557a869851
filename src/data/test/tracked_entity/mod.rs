use crate::{
    data::tracked_entity::TrackedEntityRepository,
    error::AppError,
    model::tracked::{EntityKind, EntityRef, TrackedEntity},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::tracked_entity::TrackedEntityFactory};

mod get_all;
mod replace_all;
