//! Domain models shared by the data, service and bot layers.
//!
//! Models here are plain data. Conversions from SeaORM entities happen through
//! `from_entity` constructors at the repository boundary.

pub mod alert;
pub mod bot_state;
pub mod command;
pub mod history;
pub mod leaderboard;
pub mod metric;
pub mod snapshot;
pub mod tracked;
