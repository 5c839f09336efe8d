use thiserror::Error;

/// Outcome of a failed lookup. Every variant is rendered to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Non-success response; carries the provider's message verbatim.
    #[error("{0}")]
    Provider(String),

    #[error("No forecast data for this location")]
    NoData,

    #[error("Unexpected response from the weather service")]
    Malformed,

    #[error("Network error, please try again later")]
    Network,
}

/// Used when a non-success response carries no readable `message`.
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";
