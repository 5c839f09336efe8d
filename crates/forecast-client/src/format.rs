//! Chat formatting for forecasts.
//!
//! One header line naming the city, then one line per point:
//! `HH:MM  12°C (feels like 10°C), wind 3.4 m/s, Light rain`.
//! Temperatures are rounded half away from zero (`f64::round`); wind keeps one decimal.

use crate::error::ForecastError;
use crate::model::{ForecastPoint, ForecastResponse};
use crate::FormattedForecast;

/// Stands in for any value the provider did not supply.
pub const PLACEHOLDER: &str = "—";

/// Formats a provider response. The provider's canonical city name wins over `requested_city`.
/// An empty point list is [`ForecastError::NoData`].
pub fn format_forecast(
    response: &ForecastResponse,
    requested_city: &str,
) -> Result<FormattedForecast, ForecastError> {
    if response.list.is_empty() {
        return Err(ForecastError::NoData);
    }

    let city = response
        .city
        .as_ref()
        .and_then(|c| c.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| requested_city.trim())
        .to_string();

    let mut lines = Vec::with_capacity(response.list.len() + 1);
    lines.push(format!("🌤 Forecast for {}:", city));
    lines.extend(response.list.iter().map(format_point));

    Ok(FormattedForecast {
        city,
        text: lines.join("\n"),
    })
}

/// Formats a single forecast point as one line.
pub fn format_point(point: &ForecastPoint) -> String {
    let time = point
        .dt_txt
        .as_deref()
        .and_then(time_of_day)
        .unwrap_or(PLACEHOLDER);
    let temp = point.temp().map(celsius).unwrap_or_else(placeholder);
    let feels = point.feels_like().map(celsius).unwrap_or_else(placeholder);
    let wind = point
        .wind_speed()
        .map(|w| format!("{:.1} m/s", w))
        .unwrap_or_else(placeholder);
    let description = point
        .description()
        .map(capitalize)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(placeholder);

    format!(
        "{}  {} (feels like {}), wind {}, {}",
        time, temp, feels, wind, description
    )
}

/// `2024-05-01 15:00:00` -> `15:00`.
fn time_of_day(timestamp: &str) -> Option<&str> {
    let hhmm = timestamp.get(11..16)?;
    let bytes = hhmm.as_bytes();
    let well_formed = bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit);
    well_formed.then_some(hhmm)
}

fn celsius(value: f64) -> String {
    format!("{}°C", round_temp(value))
}

/// Half away from zero; `-0.4` becomes `0`, never `-0`.
pub(crate) fn round_temp(value: f64) -> i64 {
    value.round() as i64
}

/// First character upper-cased, the rest lower-cased, folded onto one line.
fn capitalize(text: &str) -> String {
    let one_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = one_line.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}
