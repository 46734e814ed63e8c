//! Cache-aware weather client.
//!
//! [`WeatherClient`] answers from its [`WeatherCache`] while an entry is fresh and
//! goes to the provider otherwise. Only successful fetches are cached.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::{
    cache::WeatherCache,
    error::{Result, WeatherError},
    model::WeatherReading,
    provider::WeatherProvider,
};

/// Where a reading came from. Display-only metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Network,
    Cache { remaining: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedReading {
    pub reading: WeatherReading,
    pub source: Source,
}

impl CachedReading {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, Source::Cache { .. })
    }
}

#[derive(Debug)]
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
    cache: WeatherCache,
}

impl WeatherClient {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self::with_cache(provider, WeatherCache::new())
    }

    pub fn with_cache(provider: Box<dyn WeatherProvider>, cache: WeatherCache) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Resolve `city` to a reading, from cache when possible.
    pub async fn get_weather(&mut self, city: &str) -> Result<CachedReading> {
        self.get_weather_at(city, Utc::now()).await
    }

    /// Same as [`get_weather`](Self::get_weather), with freshness judged and
    /// new entries stamped at `now`.
    pub async fn get_weather_at(&mut self, city: &str, now: DateTime<Utc>) -> Result<CachedReading> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::Validation("city name is empty".into()));
        }

        if let Some(hit) = self.cache.lookup(city, now) {
            debug!(city, remaining_secs = hit.remaining.num_seconds(), "Cache hit");
            return Ok(CachedReading {
                reading: hit.reading,
                source: Source::Cache { remaining: hit.remaining },
            });
        }

        debug!(city, "Cache miss");
        let reading = self.provider.current(city).await?;
        self.cache.insert(city, reading.clone(), now);
        info!(city, resolved = reading.city(), "Fetched current weather");

        Ok(CachedReading { reading, source: Source::Network })
    }
}
