use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::WeatherReading,
};

pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Writes readings as pretty JSON files, one per export.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    #[serde(flatten)]
    reading: &'a WeatherReading,
    exported_at: DateTime<Local>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_DIR)
    }
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export `reading` stamped with the current local time.
    pub fn export(&self, reading: &WeatherReading) -> Result<PathBuf> {
        self.export_at(reading, Local::now())
    }

    pub fn export_at(&self, reading: &WeatherReading, at: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| WeatherError::Export { path: self.dir.clone(), source })?;

        let path = self.dir.join(file_name(reading.city(), at));
        let record = ExportRecord { reading, exported_at: at };

        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| WeatherError::Export { path: path.clone(), source: io::Error::other(e) })?;

        fs::write(&path, json).map_err(|source| WeatherError::Export { path: path.clone(), source })?;

        debug!(path = %path.display(), "Reading exported");
        Ok(path)
    }
}

/// `clima_<city>_<YYYYMMDD>_<HHMMSS>.json`
pub fn file_name(city: &str, at: DateTime<Local>) -> String {
    format!("clima_{}_{}.json", sanitize(city), at.format("%Y%m%d_%H%M%S"))
}

fn sanitize(city: &str) -> String {
    city.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
