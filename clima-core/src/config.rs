use tracing::debug;

use crate::error::{Result, WeatherError};

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "OPENWEATHER_BASE_URL";
pub const UNITS_VAR: &str = "OPENWEATHER_UNITS";
pub const LANG_VAR: &str = "OPENWEATHER_LANG";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_UNITS: &str = "metric";
pub const DEFAULT_LANG: &str = "pt_br";

/// Settings needed to talk to OpenWeather.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Units system sent as `units`, e.g. "metric".
    pub units: String,
    /// Language for condition descriptions, sent as `lang`.
    pub lang: String,
}

// Keeps the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Blank values count as unset; only the API key is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = var(API_KEY_VAR).ok_or_else(|| {
            WeatherError::Configuration(format!(
                "Environment variable '{API_KEY_VAR}' not found.\n\
                 Hint: set it in your shell or in a .env file in the working directory."
            ))
        })?;

        let mut config = Self::new(api_key);
        if let Some(url) = var(BASE_URL_VAR) {
            reqwest::Url::parse(&url).map_err(|e| {
                WeatherError::Configuration(format!("{BASE_URL_VAR} is not a valid URL ({e}): {url}"))
            })?;
            config.base_url = url;
        }
        if let Some(units) = var(UNITS_VAR) {
            config.units = units;
        }
        if let Some(lang) = var(LANG_VAR) {
            config.lang = lang;
        }

        debug!(?config, "Configuration loaded");
        Ok(config)
    }
}
