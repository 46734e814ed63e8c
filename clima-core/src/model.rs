use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, WeatherError};

/// Current conditions for one city, as fetched from the provider.
///
/// Fields are private: a reading is validated once in [`WeatherReading::new`]
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    city: String,
    temperature_c: f64,
    feels_like_c: f64,
    humidity_pct: u8,
    wind_speed_mps: f64,
    condition: String,
    fetched_at: DateTime<Utc>,
}

/// Unvalidated values straight out of a provider response.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: i64,
    pub wind_speed_mps: f64,
    pub condition: String,
}

impl WeatherReading {
    /// Validate `raw` and stamp it with the current time.
    pub fn new(raw: RawReading) -> Result<Self> {
        Self::new_at(raw, Utc::now())
    }

    pub fn new_at(raw: RawReading, fetched_at: DateTime<Utc>) -> Result<Self> {
        let city = raw.city.trim();
        if city.is_empty() {
            return Err(WeatherError::Validation("city name is empty".into()));
        }

        let humidity_pct = u8::try_from(raw.humidity_pct)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or_else(|| {
                WeatherError::Validation(format!(
                    "humidity must be within 0..=100, got {}",
                    raw.humidity_pct
                ))
            })?;

        for (name, value) in [
            ("temperature", raw.temperature_c),
            ("feels-like temperature", raw.feels_like_c),
            ("wind speed", raw.wind_speed_mps),
        ] {
            if !value.is_finite() {
                return Err(WeatherError::Validation(format!("{name} is not a finite number")));
            }
        }

        if raw.wind_speed_mps < 0.0 {
            return Err(WeatherError::Validation(format!(
                "wind speed cannot be negative, got {}",
                raw.wind_speed_mps
            )));
        }

        Ok(Self {
            city: city.to_string(),
            temperature_c: raw.temperature_c,
            feels_like_c: raw.feels_like_c,
            humidity_pct,
            wind_speed_mps: raw.wind_speed_mps,
            condition: raw.condition,
            fetched_at,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn feels_like_c(&self) -> f64 {
        self.feels_like_c
    }

    pub fn humidity_pct(&self) -> u8 {
        self.humidity_pct
    }

    pub fn wind_speed_mps(&self) -> f64 {
        self.wind_speed_mps
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}
