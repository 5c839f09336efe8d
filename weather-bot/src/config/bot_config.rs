//! BotConfig: credentials, storage, logging, timeouts and forecast options. Loaded from env.

use anyhow::{Context, Result};
use forecast_client::{OpenWeatherConfig, DEFAULT_API_URL};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use wbot_telegram::TelegramConfig;

use crate::update_loop::LoopSettings;

/// Upper bound on `cnt` accepted by the 5-day/3-hour forecast endpoint.
const MAX_FORECAST_POINTS: u32 = 40;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// TELEGRAM_TOKEN or BOT_TOKEN
    pub telegram_token: String,
    /// OPENWEATHER_API_KEY or WEATHER_API_KEY
    pub openweather_api_key: String,
    /// SQLite file path or `sqlite:` URL
    pub db_path: String,
    pub log_file: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub openweather_api_url: String,
    pub weather_lang: String,
    pub forecast_points: u32,
    pub poll_timeout_secs: u32,
    /// Bound on each Telegram HTTP request; must exceed the long-poll timeout.
    pub request_timeout_secs: u64,
    /// Bound on each forecast request.
    pub http_timeout_secs: u64,
    pub retry_backoff_secs: u64,
    /// SUGGESTED_CITIES, comma-separated; offered as a reply keyboard to users with no saved cities.
    pub suggested_cities: Vec<String>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides TELEGRAM_TOKEN if provided.
    ///
    /// Missing credentials load as empty strings and are rejected by [`BotConfig::validate`];
    /// numeric variables that are set but unparsable fail here.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram_token = token
            .or_else(|| env_first(&["TELEGRAM_TOKEN", "BOT_TOKEN"]))
            .unwrap_or_default();
        let openweather_api_key =
            env_first(&["OPENWEATHER_API_KEY", "WEATHER_API_KEY"]).unwrap_or_default();
        let db_path = env::var("DB_PATH").unwrap_or_else(|_| "cities.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/weather-bot.log".to_string());
        let telegram_api_url = env_first(&["TELEGRAM_API_URL", "TELOXIDE_API_URL"]);
        let openweather_api_url =
            env::var("OPENWEATHER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let weather_lang = env::var("WEATHER_LANG").unwrap_or_else(|_| "en".to_string());
        let suggested_cities = env::var("SUGGESTED_CITIES")
            .map(|s| parse_city_list(&s))
            .unwrap_or_default();

        Ok(Self {
            telegram_token,
            openweather_api_key,
            db_path,
            log_file,
            telegram_api_url,
            openweather_api_url,
            weather_lang,
            forecast_points: env_parse("FORECAST_POINTS", 6)?,
            poll_timeout_secs: env_parse("POLL_TIMEOUT_SECS", 30)?,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 35)?,
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS", 15)?,
            retry_backoff_secs: env_parse("RETRY_BACKOFF_SECS", 2)?,
            suggested_cities,
        })
    }

    /// Rejects missing credentials, malformed URLs and inconsistent timeouts.
    pub fn validate(&self) -> Result<()> {
        if self.telegram_token.trim().is_empty() {
            anyhow::bail!("Missing required configuration: TELEGRAM_TOKEN");
        }
        if self.openweather_api_key.trim().is_empty() {
            anyhow::bail!("Missing required configuration: OPENWEATHER_API_KEY or WEATHER_API_KEY");
        }
        // SQLite opens an empty filename as a throwaway temporary database.
        if self.db_path.trim().is_empty() {
            anyhow::bail!("DB_PATH is set but empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if reqwest::Url::parse(&self.openweather_api_url).is_err() {
            anyhow::bail!(
                "OPENWEATHER_API_URL is not a valid URL: {}",
                self.openweather_api_url
            );
        }
        if !(1..=MAX_FORECAST_POINTS).contains(&self.forecast_points) {
            anyhow::bail!(
                "FORECAST_POINTS must be between 1 and {}, got {}",
                MAX_FORECAST_POINTS,
                self.forecast_points
            );
        }
        if self.request_timeout_secs <= u64::from(self.poll_timeout_secs) {
            anyhow::bail!(
                "REQUEST_TIMEOUT_SECS ({}) must exceed POLL_TIMEOUT_SECS ({})",
                self.request_timeout_secs,
                self.poll_timeout_secs
            );
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }

    pub fn telegram_config(&self) -> TelegramConfig {
        let mut config = TelegramConfig::with_token(self.telegram_token.clone());
        config.telegram_api_url = self.telegram_api_url.clone();
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.error_backoff = self.retry_backoff();
        config
    }

    pub fn forecast_config(&self) -> OpenWeatherConfig {
        OpenWeatherConfig::new(self.openweather_api_key.clone())
            .with_api_url(self.openweather_api_url.clone())
            .with_lang(self.weather_lang.clone())
            .with_points(self.forecast_points)
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            poll_timeout_secs: self.poll_timeout_secs,
            error_backoff: self.retry_backoff(),
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

/// First non-empty value among `names`.
fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid number: {}", name, raw)),
        _ => Ok(default),
    }
}

pub(crate) fn parse_city_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
