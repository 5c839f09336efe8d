//! Routes inbound events to handlers and owns per-user conversation state.
//!
//! Every handler runs to completion before the next event is taken, so replies to one user
//! keep their order and [`UserStates`] needs no locking.

use forecast_client::ForecastProvider;
use std::sync::Arc;
use storage::{CityStore, SavedCity, StorageError};
use tracing::{debug, info, instrument, warn};
use wbot_core::{InboundEvent, Keyboard, Messenger, Result, WbotError};

use crate::keyboards::{saved_cities_keyboard, suggestions_keyboard};
use crate::messages::{
    forecast_error_text, ADD_CITY_TOKEN, CHOOSE_CITY, CITY_ID_PREFIX, CITY_NOT_FOUND_TOAST,
    ENTER_CITY_PROMPT, HELP_TEXT, INVALID_CITY_TOAST, MY_CITY_LABEL, NO_CITIES_PROMPT,
};
use crate::state::{ConversationState, UserStates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Weather,
    Help,
    Unknown,
}

/// Parses the first whitespace-delimited token of `text` as a command.
/// `/Weather@my_bot Oslo` is `Weather`; text not starting with `/` is not a command.
fn parse_command(text: &str) -> Option<Command> {
    let token = text.split_whitespace().next()?;
    let name = token.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or_default();
    Some(match name.to_lowercase().as_str() {
        "start" => Command::Start,
        "weather" => Command::Weather,
        "help" => Command::Help,
        _ => Command::Unknown,
    })
}

enum CallbackAction {
    AddCity,
    ShowCity(i64),
    InvalidCity,
    Ignore,
}

fn parse_callback(data: &str) -> CallbackAction {
    if data == ADD_CITY_TOKEN {
        return CallbackAction::AddCity;
    }
    match data.strip_prefix(CITY_ID_PREFIX) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(CallbackAction::ShowCity)
            .unwrap_or(CallbackAction::InvalidCity),
        None => CallbackAction::Ignore,
    }
}

fn storage_error(e: StorageError) -> WbotError {
    WbotError::Storage(e.to_string())
}

pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    forecast: Arc<dyn ForecastProvider>,
    store: CityStore,
    states: UserStates,
    suggested_cities: Vec<String>,
}

impl Dispatcher {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        forecast: Arc<dyn ForecastProvider>,
        store: CityStore,
    ) -> Self {
        Self {
            messenger,
            forecast,
            store,
            states: UserStates::new(),
            suggested_cities: Vec::new(),
        }
    }

    /// City names offered as a reply keyboard to users without saved cities.
    pub fn with_suggested_cities(mut self, cities: Vec<String>) -> Self {
        self.suggested_cities = cities;
        self
    }

    pub fn state(&self, user_id: i64) -> ConversationState {
        self.states.get(user_id)
    }

    pub fn states(&self) -> &UserStates {
        &self.states
    }

    /// Handles one event. Send failures are logged and swallowed; store failures are returned.
    #[instrument(skip(self, event), fields(user_id = event.user_id(), chat_id = event.chat_id()))]
    pub async fn handle(&mut self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::TextMessage {
                chat_id,
                user_id,
                text,
            } => self.handle_text(chat_id, user_id, &text).await,
            InboundEvent::CallbackQuery {
                id,
                chat_id,
                user_id,
                data,
            } => self.handle_callback(&id, chat_id, user_id, &data).await,
        }
    }

    async fn handle_text(&mut self, chat_id: i64, user_id: i64, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty message");
            return Ok(());
        }

        if let Some(command) = parse_command(text) {
            info!(?command, "Command received");
            return match command {
                Command::Start | Command::Weather => self.choose_city(chat_id, user_id).await,
                Command::Help | Command::Unknown => {
                    self.send(chat_id, HELP_TEXT, None).await;
                    Ok(())
                }
            };
        }

        if text == MY_CITY_LABEL {
            self.begin_city_input(chat_id, user_id).await;
            return Ok(());
        }

        self.lookup_city(chat_id, user_id, text).await
    }

    async fn handle_callback(
        &mut self,
        callback_id: &str,
        chat_id: i64,
        user_id: i64,
        data: &str,
    ) -> Result<()> {
        let outcome = match parse_callback(data) {
            CallbackAction::AddCity => {
                self.begin_city_input(chat_id, user_id).await;
                Ok(None)
            }
            CallbackAction::ShowCity(city_id) => self.show_saved_city(chat_id, user_id, city_id).await,
            CallbackAction::InvalidCity => {
                warn!(data, "Invalid city callback payload");
                Ok(Some(INVALID_CITY_TOAST))
            }
            CallbackAction::Ignore => {
                debug!(data, "Ignoring unknown callback payload");
                Ok(None)
            }
        };

        let toast = match &outcome {
            Ok(toast) => *toast,
            Err(_) => None,
        };
        if let Err(e) = self.messenger.answer_callback(callback_id, toast).await {
            warn!(error = %e, callback_id, "Failed to answer callback");
        }
        outcome.map(|_| ())
    }

    /// `/start` and `/weather`.
    async fn choose_city(&mut self, chat_id: i64, user_id: i64) -> Result<()> {
        let cities = self.store.list_cities(user_id).await.map_err(storage_error)?;
        if cities.is_empty() {
            self.states.set_awaiting(user_id);
            let keyboard = suggestions_keyboard(&self.suggested_cities);
            self.send(chat_id, NO_CITIES_PROMPT, keyboard.as_ref()).await;
        } else {
            let keyboard = saved_cities_keyboard(&cities);
            self.send(chat_id, CHOOSE_CITY, Some(&keyboard)).await;
        }
        Ok(())
    }

    async fn begin_city_input(&mut self, chat_id: i64, user_id: i64) {
        self.states.set_awaiting(user_id);
        self.send(chat_id, ENTER_CITY_PROMPT, None).await;
    }

    /// Returns the toast for the callback answer.
    async fn show_saved_city(
        &mut self,
        chat_id: i64,
        user_id: i64,
        city_id: i64,
    ) -> Result<Option<&'static str>> {
        let Some(name) = self
            .store
            .get_city_by_id(user_id, city_id)
            .await
            .map_err(storage_error)?
        else {
            info!(city_id, "Saved city not found for user");
            return Ok(Some(CITY_NOT_FOUND_TOAST));
        };

        let text = match self.forecast.fetch(&name).await {
            Ok(forecast) => forecast.text,
            Err(e) => forecast_error_text(&e),
        };
        let cities = self.store.list_cities(user_id).await.map_err(storage_error)?;
        self.send(chat_id, &text, Some(&saved_cities_keyboard(&cities)))
            .await;
        Ok(None)
    }

    /// Free text taken as a city name. Persisted on success when the user asked to add a city
    /// or has none saved yet.
    async fn lookup_city(&mut self, chat_id: i64, user_id: i64, city: &str) -> Result<()> {
        let awaiting = self.states.is_awaiting(user_id);
        // Leaves AwaitingCityInput whatever the outcome below.
        self.states.clear(user_id);

        let saved = self.store.list_cities(user_id).await.map_err(storage_error)?;
        let should_persist = awaiting || saved.is_empty();

        let (text, cities) = match self.forecast.fetch(city).await {
            Ok(forecast) => {
                let cities = if should_persist {
                    self.persist(user_id, city).await?
                } else {
                    saved
                };
                (forecast.text, cities)
            }
            Err(e) => {
                info!(city, error = %e, "Forecast lookup failed");
                (forecast_error_text(&e), saved)
            }
        };

        self.send(chat_id, &text, Some(&saved_cities_keyboard(&cities)))
            .await;
        Ok(())
    }

    /// Saves `city` and returns the refreshed list.
    async fn persist(&self, user_id: i64, city: &str) -> Result<Vec<SavedCity>> {
        let inserted = self
            .store
            .add_city(user_id, city)
            .await
            .map_err(storage_error)?;
        if inserted {
            info!(city, "City saved");
        }
        self.store.list_cities(user_id).await.map_err(storage_error)
    }

    async fn send(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) {
        if let Err(e) = self.messenger.send_message(chat_id, text, keyboard).await {
            warn!(error = %e, chat_id, "Failed to send message");
        }
    }
}
