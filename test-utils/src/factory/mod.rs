//! Factory methods for creating test data.
//!
//! Each table has its own factory module with a `Factory` struct for customization and a
//! `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let clan = factory::create_tracked_clan(&db, "Walobots").await?;
//! let player = factory::tracked_entity::TrackedEntityFactory::new(&db)
//!     .player("76561198000000001")
//!     .clan_label("Walobots")
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod metric_history;
pub mod metric_snapshot;
pub mod tracked_entity;
pub mod user_link;

pub use metric_history::create_history_row;
pub use metric_snapshot::create_metric_snapshot;
pub use tracked_entity::create_tracked_clan;
pub use user_link::create_user_link;
