//! Interactive lookup loop: read cities, fetch, print, export.

use std::io::Write;

use clima_core::{Exporter, Source, WeatherClient};
use tracing::warn;

use crate::report;

/// Words that end the session, compared case-insensitively.
pub const EXIT_KEYWORDS: &[&str] = &["sair", "exit", "quit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Empty,
    Lookup(Vec<String>),
}

/// Classify one line of user input.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();

    if EXIT_KEYWORDS.iter().any(|k| line.eq_ignore_ascii_case(k)) {
        return Command::Exit;
    }

    let cities: Vec<String> = line
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if cities.is_empty() { Command::Empty } else { Command::Lookup(cities) }
}

/// Per-batch counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub exported: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct Session {
    client: WeatherClient,
    exporter: Exporter,
}

impl Session {
    pub fn new(client: WeatherClient, exporter: Exporter) -> Self {
        Self { client, exporter }
    }

    /// Look up each city in order. Per-city failures are reported to `out` and skipped;
    /// a fatal (configuration) error aborts the batch.
    pub async fn run_batch<W: Write>(
        &mut self,
        cities: &[String],
        out: &mut W,
    ) -> anyhow::Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for city in cities {
            let fetched = match self.client.get_weather(city).await {
                Ok(fetched) => fetched,
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    warn!(city = %city, error = %err, "Lookup failed");
                    summary.failed += 1;
                    writeln!(out, "{}", report::format_error(city, &err))?;
                    continue;
                }
            };

            summary.succeeded += 1;
            if let Source::Cache { remaining } = fetched.source {
                writeln!(out, "{}", report::format_cache_notice(remaining))?;
            }
            writeln!(out, "{}", report::format_reading(&fetched.reading))?;

            match self.exporter.export(&fetched.reading) {
                Ok(path) => {
                    summary.exported += 1;
                    writeln!(out, "💾 Data saved to: {}\n", path.display())?;
                }
                Err(err) => {
                    warn!(city = %city, error = %err, "Export failed");
                    writeln!(out, "{}", report::format_error(city, &err))?;
                }
            }
        }

        Ok(summary)
    }

    /// Prompt until an exit keyword or the end of input.
    ///
    /// `prompt` yields one line per call, `None` once input is exhausted.
    pub async fn run<P, W>(&mut self, mut prompt: P, out: &mut W) -> anyhow::Result<()>
    where
        P: FnMut() -> Option<String>,
        W: Write,
    {
        writeln!(out, "{}", report::banner())?;

        while let Some(line) = prompt() {
            match parse_command(&line) {
                Command::Exit => break,
                Command::Empty => writeln!(out, "⚠️  Please enter a city name.\n")?,
                Command::Lookup(cities) => {
                    let summary = self.run_batch(&cities, out).await?;
                    if summary.total() > 1 {
                        writeln!(out, "{}", report::format_summary(&summary))?;
                    }
                }
            }
        }

        writeln!(out, "\n👋 Goodbye!\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clima_core::{RawReading, WeatherError, WeatherProvider, WeatherReading};
    use std::{
        fs,
        path::Path,
        sync::{Arc, Mutex},
    };

    /// Knows London and Tokyo, records every request.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        requests: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn current(&self, city: &str) -> clima_core::error::Result<WeatherReading> {
            self.requests.lock().unwrap().push(city.to_string());
            let (temperature_c, humidity_pct) = match city.to_lowercase().as_str() {
                "misconfigured" => {
                    return Err(WeatherError::Configuration("invalid request".into()));
                }
                "london" => (8.4, 87),
                "tokyo" => (15.2, 55),
                "broken" => (1.0, 180),
                _ => return Err(WeatherError::NotFound { city: city.to_string() }),
            };
            WeatherReading::new(RawReading {
                city: city.to_string(),
                temperature_c,
                feels_like_c: temperature_c - 1.0,
                humidity_pct,
                wind_speed_mps: 3.0,
                condition: "clear sky".into(),
            })
        }
    }

    fn session(export_dir: &Path) -> (Session, Arc<Mutex<Vec<String>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider { requests: requests.clone() };
        let session = Session::new(WeatherClient::new(Box::new(provider)), Exporter::new(export_dir));
        (session, requests)
    }

    fn exported_files(dir: &Path) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    fn cities(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parse_command_recognizes_exit_keywords() {
        assert_eq!(parse_command("sair"), Command::Exit);
        assert_eq!(parse_command("  EXIT "), Command::Exit);
        assert_eq!(parse_command("Quit"), Command::Exit);
    }

    #[test]
    fn parse_command_splits_and_trims_cities() {
        assert_eq!(
            parse_command("London, Tokyo"),
            Command::Lookup(cities(&["London", "Tokyo"]))
        );
        assert_eq!(
            parse_command("London,,Tokyo , "),
            Command::Lookup(cities(&["London", "Tokyo"]))
        );
        assert_eq!(parse_command("São Paulo"), Command::Lookup(cities(&["São Paulo"])));
    }

    #[test]
    fn parse_command_blank_input_is_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command(" , ,"), Command::Empty);
    }

    #[tokio::test]
    async fn batch_processes_each_city_and_exports_both() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, requests) = session(dir.path());
        let mut out = Vec::new();

        let summary = session.run_batch(&cities(&["London", "Tokyo"]), &mut out).await.unwrap();

        assert_eq!(summary, BatchSummary { succeeded: 2, failed: 0, exported: 2 });
        assert_eq!(*requests.lock().unwrap(), cities(&["London", "Tokyo"]));

        let files = exported_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].starts_with("clima_London_"));
        assert!(files[1].starts_with("clima_Tokyo_"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("WEATHER IN LONDON"));
        assert!(text.contains("WEATHER IN TOKYO"));
        assert_eq!(text.matches("Data saved to").count(), 2);
    }

    #[tokio::test]
    async fn failure_on_one_city_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session(dir.path());
        let mut out = Vec::new();

        let summary = session
            .run_batch(&cities(&["Atlantis", "Broken", "Tokyo"]), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 2, exported: 1 });

        let files = exported_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("clima_Tokyo_"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("City 'Atlantis' not found"));
        assert!(text.contains("humidity"));
        assert!(text.contains("WEATHER IN TOKYO"));
    }

    #[tokio::test]
    async fn repeated_city_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, requests) = session(dir.path());
        let mut out = Vec::new();

        session.run_batch(&cities(&["London"]), &mut out).await.unwrap();
        session.run_batch(&cities(&["LONDON"]), &mut out).await.unwrap();

        assert_eq!(requests.lock().unwrap().len(), 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Using cached data").count(), 1);
        assert_eq!(text.matches("WEATHER IN LONDON").count(), 2);
    }

    #[tokio::test]
    async fn export_failure_is_reported_after_the_reading() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("exports");
        fs::write(&blocker, "not a directory").unwrap();
        let (mut session, _) = session(&blocker);
        let mut out = Vec::new();

        let summary = session.run_batch(&cities(&["London"]), &mut out).await.unwrap();

        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 0, exported: 0 });
        let text = String::from_utf8(out).unwrap();
        let reading_at = text.find("WEATHER IN LONDON").unwrap();
        let error_at = text.find("Failed to export").unwrap();
        assert!(reading_at < error_at);
    }

    #[tokio::test]
    async fn run_loops_until_exit_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, requests) = session(dir.path());
        let mut lines = vec!["", "London, Tokyo", "sair", "Atlantis"].into_iter();
        let mut out = Vec::new();

        session.run(|| lines.next().map(str::to_string), &mut out).await.unwrap();

        // Nothing after the exit keyword is processed.
        assert_eq!(*requests.lock().unwrap(), cities(&["London", "Tokyo"]));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please enter a city name"));
        assert!(text.trim_end().ends_with("👋 Goodbye!"));
    }

    #[tokio::test]
    async fn configuration_error_aborts_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, requests) = session(dir.path());
        let mut out = Vec::new();

        let err = session
            .run_batch(&cities(&["Misconfigured", "Tokyo"]), &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Configuration error"));
        assert_eq!(*requests.lock().unwrap(), cities(&["Misconfigured"]));
        assert!(exported_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn multi_city_batch_prints_a_summary() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session(dir.path());
        let mut lines = vec!["London, Atlantis", "Tokyo"].into_iter();
        let mut out = Vec::new();

        session.run(|| lines.next().map(str::to_string), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        // Only the two-city batch gets a summary line.
        assert_eq!(text.matches("Batch done").count(), 1);
        assert!(text.contains("Batch done: 1 of 2 succeeded, 1 failed, 1 saved"));
    }

    #[tokio::test]
    async fn run_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, requests) = session(dir.path());
        let mut out = Vec::new();

        session.run(|| None, &mut out).await.unwrap();

        assert!(requests.lock().unwrap().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Goodbye"));
    }
}
