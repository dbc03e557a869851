//! Ready event handler for bot initialization.
//!
//! The ready event fires after every successful gateway handshake, including
//! reconnects. The first one starts the poll scheduler and runs an immediate cycle so
//! the baseline and embeds are fresh without waiting a full interval.

use serenity::all::{ActivityData, Context, Ready};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    scheduler::poll::{run_guarded, start_scheduler},
    service::notifier::{DiscordNotifier, Notifier},
    state::AppState,
};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared application state
/// - `started` - Flag guarding one-time startup work
/// - `ctx` - Discord context providing the HTTP client
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, started: &AtomicBool, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::watching("the leaderboards")));

    if started.swap(true, Ordering::SeqCst) {
        return;
    }

    let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(ctx.http.clone()));

    if let Err(e) = start_scheduler(state.clone(), notifier.clone()).await {
        tracing::error!("Failed to start poll scheduler: {}", e);
    }

    let state = state.clone();
    tokio::spawn(async move {
        run_guarded(&state, notifier.as_ref()).await;
    });
}
