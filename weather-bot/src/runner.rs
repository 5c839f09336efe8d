use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};
use wbot_core::{init_tracing, Messenger};

use crate::components::{build_components, BotComponents};
use crate::config::BotConfig;
use crate::dispatcher::Dispatcher;
use crate::update_loop::UpdateLoop;

/// Wires components into a ready-to-run loop. Tests call this with mock collaborators.
pub fn build_update_loop(
    config: &BotConfig,
    messenger: Arc<dyn Messenger>,
    components: &BotComponents,
) -> UpdateLoop {
    let dispatcher = Dispatcher::new(
        Arc::clone(&messenger),
        Arc::clone(&components.forecast),
        components.store.clone(),
    )
    .with_suggested_cities(config.suggested_cities.clone());
    UpdateLoop::new(messenger, dispatcher, config.loop_settings())
}

/// Main entry: validate config, init logging, build components, then poll until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        db_path = %config.db_path,
        poll_timeout_secs = config.poll_timeout_secs,
        "Initializing bot"
    );

    let components = build_components(&config).await?;

    match components.telegram.get_me().await {
        Ok(Some(username)) => info!(username = %username, "Bot identity confirmed"),
        Ok(None) => info!("Bot identity confirmed (no username)"),
        Err(e) => warn!(error = %e, "getMe failed; continuing"),
    }

    let messenger: Arc<dyn Messenger> = components.telegram.clone();
    let mut update_loop = build_update_loop(&config, messenger, &components);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive: a dropped sender also stops the loop.
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    });

    info!("Bot started successfully");
    update_loop.run(shutdown_rx).await;
    info!("Bot stopped");

    Ok(())
}
