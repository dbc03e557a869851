mod api;
mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use crate::{api::rusticated::RusticatedClient, config::Config, state::AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let source = Arc::new(RusticatedClient::new(&config)?);

    let state = AppState::init(db, config, source).await?;

    let client = bot::start::init_bot(state.clone()).await?;
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        result = bot::start::start_bot(client) => {
            if let Err(e) = result {
                tracing::error!("Discord bot error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shard_manager.shutdown_all().await;
        }
    }

    state.teardown().await;

    Ok(())
}
