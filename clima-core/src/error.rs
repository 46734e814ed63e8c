use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while resolving, validating or exporting a reading.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Missing or unusable startup configuration. Fatal.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider does not know the requested city.
    #[error("City not found: {city}")]
    NotFound { city: String },

    /// The provider rejected the API key (HTTP 401).
    #[error("Invalid API key. Check OPENWEATHER_API_KEY in your environment or .env file")]
    InvalidApiKey,

    /// Any other non-success HTTP status.
    #[error("Weather API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (timeout, DNS, refused connection...).
    #[error("Could not reach the weather API: {0}")]
    Connection(#[source] reqwest::Error),

    /// The response did not have the expected shape or broke a reading invariant.
    #[error("Unexpected weather data: {0}")]
    Validation(String),

    /// Writing an export file failed.
    #[error("Failed to export reading to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WeatherError {
    /// Only configuration problems should stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WeatherError::Configuration(_))
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
