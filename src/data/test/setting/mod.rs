use crate::data::setting::SettingRepository;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod delete;
mod get_set;
