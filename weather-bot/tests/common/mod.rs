//! Shared test doubles: a recording Messenger, a scripted ForecastProvider, and a temp-file store.
#![allow(dead_code)]

use async_trait::async_trait;
use forecast_client::{ForecastError, ForecastProvider, FormattedForecast};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use storage::CityStore;
use tempfile::TempDir;
use wbot_core::{InboundEvent, Keyboard, Messenger, Result, Update};

pub const CHAT_ID: i64 = 555;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl SentMessage {
    pub fn labels(&self) -> Vec<&str> {
        self.keyboard.as_ref().map(|k| k.labels()).unwrap_or_default()
    }
}

/// Serves queued batches in order, then empty batches after a short pause; records everything sent.
#[derive(Default)]
pub struct MockMessenger {
    batches: Mutex<VecDeque<Vec<Update>>>,
    offsets: Mutex<Vec<i64>>,
    sent: Mutex<Vec<SentMessage>>,
    answers: Mutex<Vec<(String, Option<String>)>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batches(batches: Vec<Vec<Update>>) -> Self {
        let messenger = Self::new();
        *messenger.batches.lock().unwrap() = batches.into();
        messenger
    }

    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> SentMessage {
        self.sent().last().cloned().expect("no message sent")
    }

    pub fn answers(&self) -> Vec<(String, Option<String>)> {
        self.answers.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn get_updates(&self, offset: i64, _timeout_secs: u32) -> Vec<Update> {
        self.offsets.lock().unwrap().push(offset);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Vec::new()
            }
        }
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.answers
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }
}

/// Knows a fixed set of cities (case-insensitive); anything else is "city not found".
/// A city registered with [`MockForecast::panicking_on`] panics inside `fetch`.
#[derive(Default)]
pub struct MockForecast {
    known: HashMap<String, String>,
    panic_on: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockForecast {
    pub fn knowing(cities: &[&str]) -> Self {
        Self {
            known: cities
                .iter()
                .map(|c| (c.to_lowercase(), c.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn panicking_on(mut self, city: &str) -> Self {
        self.panic_on = Some(city.to_lowercase());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn forecast_text(city: &str) -> String {
    format!(
        "🌤 Forecast for {}:\n12:00  5°C (feels like 3°C), wind 2.0 m/s, Clear sky",
        city
    )
}

#[async_trait]
impl ForecastProvider for MockForecast {
    async fn fetch(&self, city: &str) -> std::result::Result<FormattedForecast, ForecastError> {
        self.calls.lock().unwrap().push(city.to_string());
        let key = city.to_lowercase();
        if self.panic_on.as_deref() == Some(key.as_str()) {
            panic!("forecast backend exploded for {}", city);
        }
        match self.known.get(&key) {
            Some(name) => Ok(FormattedForecast {
                city: name.clone(),
                text: forecast_text(name),
            }),
            None => Err(ForecastError::Provider("city not found".to_string())),
        }
    }
}

/// Store backed by a file in a fresh temp dir; keep the TempDir alive for the test.
pub async fn temp_store() -> (TempDir, CityStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cities.db");
    let store = CityStore::open(path.to_str().expect("utf-8 path"))
        .await
        .expect("open store");
    (dir, store)
}

pub fn text(user_id: i64, text: &str) -> InboundEvent {
    InboundEvent::TextMessage {
        chat_id: CHAT_ID,
        user_id,
        text: text.to_string(),
    }
}

pub fn callback(user_id: i64, id: &str, data: &str) -> InboundEvent {
    InboundEvent::CallbackQuery {
        id: id.to_string(),
        chat_id: CHAT_ID,
        user_id,
        data: data.to_string(),
    }
}
