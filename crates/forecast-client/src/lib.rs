//! # Forecast client
//!
//! Fetches a short-range, multi-point forecast for a free-text location and formats it as a
//! chat message.
//!
//! ## OpenWeatherClient
//!
//! Calls the OpenWeatherMap 5 day / 3 hour forecast endpoint, limited to `points` entries
//! (6 by default, i.e. ~18 hours), metric units and a fixed description language.
//!
//! Provider failures are values, not faults: an unknown city comes back as
//! [`ForecastError::Provider`] carrying the provider's own message, timeouts and transport
//! failures as [`ForecastError::Network`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use forecast_client::{ForecastProvider, OpenWeatherClient, OpenWeatherConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenWeatherClient::new(OpenWeatherConfig::new("your-api-key"))?;
//!     match client.fetch("Berlin").await {
//!         Ok(forecast) => println!("{}", forecast.text),
//!         Err(e) => println!("❌ {}", e),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod format;
mod model;
mod openweather;


use async_trait::async_trait;

pub use error::{ForecastError, UNKNOWN_API_ERROR};
pub use format::{format_forecast, format_point, PLACEHOLDER};
pub use model::{City, ForecastPoint, ForecastResponse, MainBlock, WeatherBlock, WindBlock};
pub use openweather::{OpenWeatherClient, OpenWeatherConfig, DEFAULT_API_URL};

/// A forecast ready to send: resolved city name and the multi-line message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedForecast {
    pub city: String,
    pub text: String,
}

/// Source of formatted forecasts. Implemented by [`OpenWeatherClient`]; tests substitute canned results.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<FormattedForecast, ForecastError>;
}
