//! Discord gateway integration.
//!
//! The bot listens for prefix commands in guild channels and, once connected, starts the
//! poll scheduler. Outgoing messages go through the serenity HTTP client wrapped in a
//! `DiscordNotifier`.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild and channel availability
//! - `GUILD_MESSAGES` - Message events for prefix commands
//! - `MESSAGE_CONTENT` - Message text; a privileged intent that must be enabled in the
//!   Discord Developer Portal

pub mod handler;
pub mod start;
