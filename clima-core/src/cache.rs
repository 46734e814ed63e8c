//! In-memory TTL cache for weather readings.
//!
//! Keys are normalized city names, so "London" and " london " share an entry.
//! Stale entries are never evicted; the next successful fetch overwrites them.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::model::WeatherReading;

/// How long a reading is served from the cache.
pub const CACHE_TTL: Duration = Duration::minutes(5);

#[derive(Debug, Clone)]
struct CacheEntry {
    reading: WeatherReading,
    inserted_at: DateTime<Utc>,
}

/// A fresh entry found by [`WeatherCache::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub reading: WeatherReading,
    /// Time left before the entry goes stale.
    pub remaining: Duration,
}

#[derive(Debug, Clone)]
pub struct WeatherCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: HashMap::new(), ttl }
    }

    /// Case-insensitive cache key for a city name.
    pub fn normalize(city: &str) -> String {
        city.trim().to_lowercase()
    }

    /// Return the cached reading for `city` if it is younger than the TTL at `now`.
    pub fn lookup(&self, city: &str, now: DateTime<Utc>) -> Option<CacheHit> {
        let entry = self.entries.get(&Self::normalize(city))?;
        let age = now - entry.inserted_at;

        if age < self.ttl {
            Some(CacheHit { reading: entry.reading.clone(), remaining: self.ttl - age })
        } else {
            None
        }
    }

    /// Insert or overwrite the entry for `city`.
    pub fn insert(&mut self, city: &str, reading: WeatherReading, now: DateTime<Utc>) {
        self.entries.insert(Self::normalize(city), CacheEntry { reading, inserted_at: now });
    }

    /// Insertion time of the entry for `city`, fresh or stale.
    pub fn inserted_at(&self, city: &str) -> Option<DateTime<Utc>> {
        self.entries.get(&Self::normalize(city)).map(|e| e.inserted_at)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.entries.contains_key(&Self::normalize(city))
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
