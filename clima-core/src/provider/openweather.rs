use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    Config,
    error::{Result, WeatherError},
    model::{RawReading, WeatherReading},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: Config,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: Config) -> Self {
        Self { config, http: Client::new() }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReading> {
        debug!(city, url = %self.config.base_url, "Requesting current weather");

        let res = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", self.config.units.as_str()),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .await
            .map_err(request_error)?;

        let status = res.status();
        let body = res.text().await.map_err(request_error)?;

        debug!(city, %status, bytes = body.len(), "OpenWeather responded");

        check_status(status, city, &body)?;
        parse_current(&body, city)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReading> {
        self.fetch_current(city).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Classify a reqwest failure. The URL is dropped because it carries the API key.
fn request_error(e: reqwest::Error) -> WeatherError {
    if e.is_builder() {
        WeatherError::Configuration(format!("invalid request to the weather API: {}", e.without_url()))
    } else {
        WeatherError::Connection(e.without_url())
    }
}

fn check_status(status: StatusCode, city: &str, body: &str) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(WeatherError::NotFound { city: city.to_string() })
    } else if status == StatusCode::UNAUTHORIZED {
        Err(WeatherError::InvalidApiKey)
    } else {
        Err(WeatherError::Api { status: status.as_u16(), message: truncate_body(body) })
    }
}

/// Turn a "current weather" body into a validated reading.
///
/// `requested` is used as the city name when the payload has none.
fn parse_current(body: &str, requested: &str) -> Result<WeatherReading> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        WeatherError::Validation(format!("failed to parse OpenWeather current JSON: {e}"))
    })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| WeatherError::Validation("response contained no weather conditions".into()))?;

    let city = parsed
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| requested.to_string());

    WeatherReading::new(RawReading {
        city,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        condition,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
