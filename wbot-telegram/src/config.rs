//! Minimal Telegram transport config: token, optional API URL, request timeout and error backoff.

use anyhow::Result;
use std::time::Duration;

pub struct TelegramConfig {
    pub bot_token: String,
    /// Overrides `https://api.telegram.org` (tests point this at a mock server).
    pub telegram_api_url: Option<String>,
    /// Upper bound for every HTTP request, long polls included; must exceed the long-poll timeout.
    pub request_timeout: Duration,
    /// Pause after a failed `getUpdates` so an outage does not turn into a busy loop.
    pub error_backoff: Duration,
}

impl TelegramConfig {
    /// Uses the given token; 35 s request timeout, 2 s error backoff, default API URL.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            request_timeout: Duration::from_secs(35),
            error_backoff: Duration::from_secs(2),
        }
    }

    /// Parsed API URL override, if any.
    pub fn api_url(&self) -> Result<Option<reqwest::Url>> {
        self.telegram_api_url
            .as_deref()
            .map(|s| {
                reqwest::Url::parse(s)
                    .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL '{}': {}", s, e))
            })
            .transpose()
    }
}
