use crate::{data::user_link::UserLinkRepository, error::AppError};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::create_user_link};

mod find_steam_id;
mod get_all;
mod upsert;
