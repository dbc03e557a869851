//! Service layer for bot behaviour.
//!
//! Services sit between the Discord handler and scheduler on one side and the data and
//! API layers on the other. They work with domain models and reach Discord only through
//! the `Notifier` trait:
//!
//! - **Poll** (`poll`) - One leaderboard poll cycle and its alerts
//! - **Delta** (`delta`) - Pure snapshot comparison producing alerts
//! - **Commands** (`command`) - Executing parsed chat commands
//! - **Embeds** (`embed`, `persistent`) - Message builders and the edited-in-place embeds

pub mod command;
pub mod delta;
pub mod embed;
pub mod notifier;
pub mod persistent;
pub mod poll;
pub mod wins;
