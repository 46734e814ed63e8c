use std::io::{self, BufRead, IsTerminal};

use anyhow::Context;
use clap::Parser;
use clima_core::{Config, Exporter, WeatherClient, provider_from_config};
use inquire::{InquireError, Text};
use tracing::{info, warn};

use crate::session::Session;

const PROMPT: &str = "City name(s), comma-separated (or 'sair' to quit):";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "clima",
    version,
    about = "Look up current weather for one or more cities",
    long_about = "Look up current weather for one or more cities.\n\n\
                  Reads OPENWEATHER_API_KEY from the environment or a .env file, \
                  then prompts for city names. Each successful lookup is saved as JSON \
                  under ./exports."
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing();

        let config = Config::from_env().context("Failed to load configuration")?;
        info!(?config, "Starting clima");

        let client = WeatherClient::new(provider_from_config(&config));
        let exporter = Exporter::default();
        info!(dir = %exporter.dir().display(), "Readings will be exported");
        let mut session = Session::new(client, exporter);
        let mut stdout = io::stdout();

        if io::stdin().is_terminal() {
            session.run(prompt_line, &mut stdout).await?;
        } else {
            let mut lines = io::stdin().lock().lines();
            session.run(|| read_line(&mut lines), &mut stdout).await?;
        }

        Ok(())
    }
}

/// Ask for the next line; cancellation (Esc / Ctrl-C) ends the session.
fn prompt_line() -> Option<String> {
    match Text::new(PROMPT).prompt() {
        Ok(line) => Some(line),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
        Err(e) => {
            warn!(error = %e, "Prompt failed");
            None
        }
    }
}

/// Next line from piped input; a read error ends the session like end of input.
fn read_line<L>(lines: &mut L) -> Option<String>
where
    L: Iterator<Item = io::Result<String>>,
{
    match lines.next()? {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "Failed to read input");
            None
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clima=warn,clima_core=warn".into()),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}
