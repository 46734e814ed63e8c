//! Core library for the `clima` CLI.
//!
//! This crate defines:
//! - Configuration loaded from the environment
//! - The validated weather reading model and error taxonomy
//! - Abstraction over the weather provider (OpenWeather)
//! - The cache-aware client and the JSON exporter
//!
//! It is used by `clima-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod provider;

pub use cache::{CACHE_TTL, WeatherCache};
pub use client::{CachedReading, Source, WeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use export::Exporter;
pub use model::{RawReading, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
