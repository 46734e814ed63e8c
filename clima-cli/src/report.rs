//! Human-friendly text for readings and errors.

use chrono::Duration;
use clima_core::{WeatherError, WeatherReading};

use crate::session::BatchSummary;

const RULE_WIDTH: usize = 40;

pub fn banner() -> String {
    "\n🌡️  CLIMA - Current weather lookup\n".to_string()
}

pub fn format_reading(reading: &WeatherReading) -> String {
    let rule = "=".repeat(RULE_WIDTH);

    format!(
        "\n{rule}\n\
         🌡️  WEATHER IN {city}\n\
         {rule}\n\n\
         🌡️  Temperature:  {temp:.1}°C\n\
         🤒 Feels like:   {feels:.1}°C\n\
         💧 Humidity:     {humidity}%\n\
         💨 Wind:         {wind:.1} m/s\n\
         ☁️  Condition:    {condition}\n\n\
         {rule}\n",
        city = reading.city().to_uppercase(),
        temp = reading.temperature_c(),
        feels = reading.feels_like_c(),
        humidity = reading.humidity_pct(),
        wind = reading.wind_speed_mps(),
        condition = capitalize(reading.condition()),
    )
}

pub fn format_cache_notice(remaining: Duration) -> String {
    format!("📦 Using cached data ({}s remaining)", remaining.num_seconds().max(0))
}

pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "📋 Batch done: {} of {} succeeded, {} failed, {} saved\n",
        summary.succeeded,
        summary.total(),
        summary.failed,
        summary.exported,
    )
}

pub fn format_error(city: &str, err: &WeatherError) -> String {
    match err {
        WeatherError::NotFound { .. } => format!(
            "\n❌ City '{city}' not found.\n\
             💡 Hint: try the English name without accents (e.g. 'Sao Paulo').\n"
        ),
        WeatherError::Connection(_) => format!(
            "\n🌐 Connection problem: {err}\n\
             💡 Check your internet connection and try again.\n"
        ),
        WeatherError::Export { .. } => format!("\n⚠️  {err}\n"),
        _ => format!("\n⚠️  Could not get weather for '{city}': {err}\n"),
    }
}

/// Upper-case the first character, leave the rest alone.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
