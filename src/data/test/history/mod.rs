use crate::{data::history::HistoryRepository, model::history::HistoryPoint};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::create_history_row};

mod append;
mod prune;
mod since;
