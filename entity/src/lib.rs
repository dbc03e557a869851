//! SeaORM entity models for the bot's SQLite database.

pub mod prelude;

pub mod bot_setting;
pub mod leader_snapshot;
pub mod metric_history;
pub mod metric_snapshot;
pub mod tracked_entity;
pub mod user_link;
