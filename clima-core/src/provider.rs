use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, WeatherReading, error::Result, provider::openweather::OpenWeatherProvider};

pub mod openweather;

/// Source of current weather readings.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and validate the current conditions for `city`.
    async fn current(&self, city: &str) -> Result<WeatherReading>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherProvider::new(config.clone()))
}
