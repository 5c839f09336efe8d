//! Keyboards attached to bot replies.

use storage::SavedCity;
use wbot_core::{Button, Keyboard};

use crate::messages::{city_token, ADD_CITY_TOKEN, MY_CITY_LABEL};

const BUTTONS_PER_ROW: usize = 2;

/// Saved cities as inline buttons, two per row in list order, then a full-width "My city" button.
pub fn saved_cities_keyboard(cities: &[SavedCity]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = cities
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|c| Button::callback(c.name.clone(), city_token(c.id)))
                .collect()
        })
        .collect();
    rows.push(vec![Button::callback(MY_CITY_LABEL, ADD_CITY_TOKEN)]);
    Keyboard::inline(rows)
}

/// Reply keyboard of suggested city names plus "My city"; `None` when nothing is suggested.
pub fn suggestions_keyboard(suggested: &[String]) -> Option<Keyboard> {
    if suggested.is_empty() {
        return None;
    }
    let mut rows: Vec<Vec<Button>> = suggested
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| chunk.iter().map(|name| Button::text(name.clone())).collect())
        .collect();
    rows.push(vec![Button::text(MY_CITY_LABEL)]);
    Some(Keyboard::reply(rows))
}
