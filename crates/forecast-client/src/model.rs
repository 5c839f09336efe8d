//! Provider payload, typed. Every field is optional: a missing, `null` or wrongly typed value
//! becomes `None` (or an empty list) and is rendered as a placeholder instead of failing the
//! whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<City>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub list: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct City {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastPoint {
    /// `YYYY-MM-DD HH:MM:SS`.
    #[serde(default, deserialize_with = "lenient")]
    pub dt_txt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<MainBlock>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind: Option<WindBlock>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub weather: Vec<WeatherBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBlock {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBlock {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherBlock {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ForecastPoint {
    pub fn temp(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    pub fn feels_like(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.feels_like)
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.wind.as_ref().and_then(|w| w.speed)
    }

    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.description.as_deref())
    }
}

/// Accepts any JSON value; only numbers become `Some`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Accepts any JSON value; `None` unless it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], with `null` or a non-array read as an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient::<D, Vec<T>>(deserializer)?.unwrap_or_default())
}
