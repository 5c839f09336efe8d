//! User-facing texts and callback tokens.

use forecast_client::ForecastError;

/// Label of the trailing keyboard button that starts city registration.
pub const MY_CITY_LABEL: &str = "My city";
pub const ADD_CITY_TOKEN: &str = "add_city";
pub const CITY_ID_PREFIX: &str = "city_id:";

pub const NO_CITIES_PROMPT: &str =
    "You have no saved cities yet. Send me the name of a city to get its forecast:";
pub const ENTER_CITY_PROMPT: &str = "Enter the name of your city:";
pub const CHOOSE_CITY: &str = "Choose a city:";

pub const INVALID_CITY_TOAST: &str = "Invalid city";
pub const CITY_NOT_FOUND_TOAST: &str = "City not found";

pub const HELP_TEXT: &str = "🌤 Weather bot\n\
\n\
/start or /weather - choose one of your saved cities\n\
/help - show this message\n\
\n\
Send the name of any city to get a forecast for the next hours. \
Press \"My city\" to add a new city to your list.";

/// Error line shown in place of a forecast.
pub fn forecast_error_text(err: &ForecastError) -> String {
    format!("❌ {}", err)
}

/// Callback token for a saved city button.
pub fn city_token(id: i64) -> String {
    format!("{}{}", CITY_ID_PREFIX, id)
}
