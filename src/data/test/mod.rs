mod history;
mod setting;
mod snapshot;
mod state;
mod tracked_entity;
mod user_link;
