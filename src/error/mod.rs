//! Error types for the bot.
//!
//! `AppError` is the top-level error returned by services, repositories and startup code.
//! Domain errors (`ConfigError`, `ApiError`, `InternalError`) convert into it with `?`.
//! Nothing here is fatal at runtime; handlers and the poll job log the error with
//! `tracing::error!` and carry on. Only configuration errors abort startup.

pub mod api;
pub mod config;
pub mod internal;

use thiserror::Error;

use crate::error::{api::ApiError, config::ConfigError, internal::InternalError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid environment configuration.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Leaderboard API request failed or returned something unusable.
    #[error(transparent)]
    ApiErr(#[from] ApiError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Unexpected internal state, usually bad data read back from storage.
    #[error(transparent)]
    InternalErr(#[from] InternalError),
}

/// Boxes the error to keep `AppError` small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
