//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::{Context, Result};
use forecast_client::{ForecastProvider, OpenWeatherClient};
use std::sync::Arc;
use storage::CityStore;
use tracing::{info, instrument};
use wbot_telegram::TelegramMessenger;

use crate::config::BotConfig;

/// Collaborators of the update loop; produced by the component factory.
pub struct BotComponents {
    pub telegram: Arc<TelegramMessenger>,
    pub forecast: Arc<dyn ForecastProvider>,
    pub store: CityStore,
}

/// Opens the city database (fatal if it cannot be created) and builds the HTTP clients.
#[instrument(skip(config))]
pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let store = CityStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open city database at {}", config.db_path))?;
    info!(db_path = %config.db_path, "City database ready");

    let telegram = TelegramMessenger::new(&config.telegram_config())
        .context("Failed to build Telegram client")?;

    let forecast = OpenWeatherClient::new(config.forecast_config())
        .context("Failed to build forecast client")?;
    info!(
        api_url = %config.openweather_api_url,
        lang = %config.weather_lang,
        points = config.forecast_points,
        "Forecast client ready"
    );

    Ok(BotComponents {
        telegram: Arc::new(telegram),
        forecast: Arc::new(forecast),
        store,
    })
}
