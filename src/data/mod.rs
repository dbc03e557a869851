//! Database repository layer for the bot's persisted state.
//!
//! Repositories wrap SeaORM queries for one table each and return domain models, keeping
//! entity models out of the service layer. They are generic over `ConnectionTrait` so the
//! state repository can run them inside a single transaction.

pub mod history;
pub mod setting;
pub mod snapshot;
pub mod state;
pub mod tracked_entity;
pub mod user_link;

#[cfg(test)]
mod test;
