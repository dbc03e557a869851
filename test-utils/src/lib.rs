//! Rustinity Test Utils
//!
//! Provides shared testing utilities for the bot's repository and service tests. This crate
//! offers a builder pattern for creating test contexts with in-memory SQLite databases and
//! the subset of tables a test needs.
//!
//! # Overview
//!
//! The test utilities consist of three main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::TrackedEntity;
//!
//! #[tokio::test]
//! async fn tracks_clan() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(TrackedEntity)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
