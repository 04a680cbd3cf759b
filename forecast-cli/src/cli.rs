use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastProvider, provider_from_config};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast CLI")]
pub struct Cli {
    /// Log requests and decoding details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and endpoint in the config file.
    Configure,

    /// Show the current forecast for a place or a coordinate pair.
    Show {
        /// Place name, resolved through the geocoder.
        #[arg(required_unless_present = "lat")]
        place: Option<String>,

        /// Latitude in degrees, -90 to 90.
        #[arg(long, requires = "lon", conflicts_with = "place", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees, -180 to 180.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the forecast record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show {
                place,
                lat,
                lon,
                json,
            } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                show(provider.as_ref(), place, lat.zip(lon), json).await?;
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Forecast API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let base_url = Text::new("Forecast endpoint:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read forecast endpoint")?;

    config.set_api_key(api_key.to_string());
    config.base_url = base_url.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    provider: &dyn ForecastProvider,
    place: Option<String>,
    coords: Option<(f64, f64)>,
    json: bool,
) -> anyhow::Result<()> {
    let (label, record) = match (coords, place) {
        (Some((lat, lon)), _) => (format!("{lat}, {lon}"), provider.fetch(lat, lon).await),
        (None, Some(place)) => {
            let record = provider.fetch_by_name(&place).await;
            (place, record)
        }
        (None, None) => bail!("Give a place name or both --lat and --lon"),
    };

    let record = record.with_context(|| format!("Failed to fetch forecast for {label}"))?;
    debug!(condition = %record.condition(), "fetched forecast");

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", output::render(&label, &record));
    }

    Ok(())
}
