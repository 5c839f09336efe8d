//! OpenWeatherMap forecast client.

use crate::error::{ForecastError, UNKNOWN_API_ERROR};
use crate::format::format_forecast;
use crate::model::{ForecastResponse, ProviderErrorBody};
use crate::{ForecastProvider, FormattedForecast};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Units are fixed: temperatures in °C, wind in m/s.
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub api_url: String,
    /// Language of the provider's descriptions (`en`, `ru`, ...).
    pub lang: String,
    /// Number of 3-hour points to request.
    pub points: u32,
    pub timeout: Duration,
}

impl OpenWeatherConfig {
    /// Defaults: public endpoint, English descriptions, 6 points, 15 s timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            lang: "en".to_string(),
            points: 6,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    /// Builds the HTTP client; every request is bounded by `config.timeout`.
    pub fn new(config: OpenWeatherConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    /// Requests the forecast for `city` and formats it.
    ///
    /// # External Interactions
    ///
    /// - **OpenWeatherMap API**: one GET to the configured forecast endpoint
    ///   (`q`, `appid`, `units=metric`, `lang`, `cnt`).
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Provider`] on a non-2xx status, with the provider's `message`
    ///   (or "Unknown API error")
    /// - [`ForecastError::Malformed`] when a 2xx body is not a forecast payload
    /// - [`ForecastError::NoData`] when the payload holds no points
    /// - [`ForecastError::Network`] on timeout or transport failure
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<FormattedForecast, ForecastError> {
        let city = city.trim();
        let points = self.config.points.to_string();

        info!(
            city = %city,
            lang = %self.config.lang,
            points = self.config.points,
            "step: forecast request"
        );

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", UNITS),
                ("lang", self.config.lang.as_str()),
                ("cnt", points.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let timeout = e.is_timeout();
                warn!(city = %city, timeout, error = %e.without_url(), "Forecast request failed");
                ForecastError::Network
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(city = %city, error = %e.without_url(), "Failed to read forecast response");
            ForecastError::Network
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
            info!(city = %city, status = %status, message = %message, "Forecast provider error");
            return Err(ForecastError::Provider(message));
        }

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(city = %city, error = %e, "Malformed forecast response");
            ForecastError::Malformed
        })?;

        let formatted = format_forecast(&parsed, city)?;
        info!(
            city = %city,
            resolved = %formatted.city,
            points = parsed.list.len(),
            "step: forecast done"
        );
        Ok(formatted)
    }
}
