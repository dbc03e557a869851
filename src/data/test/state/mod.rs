use crate::{
    data::{setting::SettingRepository, state::StateRepository},
    error::AppError,
    model::{
        bot_state::{BotState, PersistentKind},
        metric::MetricId,
        snapshot::EntitySnapshot,
        tracked::{EntityRef, TrackedEntity},
    },
};
use chrono::Utc;
use test_utils::builder::TestBuilder;

mod load;
mod save;
