use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::debug;

use skycast_core::{
    Config, HourlyTrendDisplay, Location, LocationQuery, ProviderId, WeatherCache, WeatherProvider,
    WeatherRepository,
    provider::{default_provider_from_config, provider_from_config},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Multi-source weather forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "accu" or "metie".
        provider: String,

        /// Make this provider the default even if another one is set.
        #[arg(long)]
        default: bool,
    },

    /// Show the forecast for a coordinate.
    Show {
        #[command(flatten)]
        place: Place,

        /// Postal code appended to the place name.
        #[arg(long)]
        zip: Option<String>,

        /// Ignore cached weather and fetch again.
        #[arg(long)]
        force: bool,

        /// Print the full weather model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show active alerts for a coordinate.
    Alerts {
        #[command(flatten)]
        place: Place,
    },

    /// Inspect or reorder the hourly trend columns.
    Trend {
        #[command(subcommand)]
        action: TrendAction,
    },

    /// List weather sources and whether they are ready to use.
    Sources,
}

#[derive(Debug, clap::Args)]
pub struct Place {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Provider to use instead of the configured default.
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TrendAction {
    /// Shown columns in order, then the hidden ones.
    List,
    /// Append a column.
    Add { tag: String },
    /// Hide a column.
    Remove { tag: String },
    /// Move the column at position FROM to position TO (1-based).
    Move { from: usize, to: usize },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider, default } => configure(&provider, default),
            Command::Show { place, zip, force, json } => show(place, zip, force, json).await,
            Command::Alerts { place } => alerts(place).await,
            Command::Trend { action } => trend(action),
            Command::Sources => sources(),
        }
    }
}

fn configure(provider: &str, make_default: bool) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.is_available() {
        bail!("Provider '{id}' is not available in this build.");
    }

    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("{} API key:", id.display_name()))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;

        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            bail!("API key must not be empty.");
        }
        config.upsert_provider_api_key(id, api_key);
    } else {
        println!("{} needs no API key.", id.display_name());
        if config.default_provider.is_none() {
            config.set_default_provider(id);
        }
    }

    if make_default {
        config.set_default_provider(id);
    }

    config.save()?;
    println!(
        "Saved configuration to {} (default provider: {}).",
        Config::config_file_path()?.display(),
        config.default_provider.as_deref().unwrap_or("none")
    );
    Ok(())
}

fn resolve_provider(config: &Config, requested: Option<&str>) -> Result<Box<dyn WeatherProvider>> {
    match requested {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, config),
        None => default_provider_from_config(config),
    }
}

/// Fail early when the provider cannot serve the coordinate at all.
fn ensure_covered(provider: &dyn WeatherProvider, latitude: f64, longitude: f64) -> Result<()> {
    if !provider.supports_coordinates(latitude, longitude) {
        bail!(
            "{} does not cover {latitude:.4}, {longitude:.4}.",
            provider.id().display_name()
        );
    }
    Ok(())
}

async fn locate(repository: &WeatherRepository<'_>, query: &LocationQuery) -> Result<Location> {
    let location = repository.resolve_location(query).await?;
    debug!(location = %location.formatted_id(), "resolved location");
    Ok(location)
}

async fn show(place: Place, zip: Option<String>, force: bool, json: bool) -> Result<()> {
    let config = Config::load()?;
    let provider = resolve_provider(&config, place.provider.as_deref())?;
    ensure_covered(provider.as_ref(), place.lat, place.lon)?;

    let repository = WeatherRepository::new(
        provider.as_ref(),
        WeatherCache::open_default()?,
        config.polling_interval(),
    );
    let query = LocationQuery { latitude: place.lat, longitude: place.lon, zip_code: zip };
    let location = locate(&repository, &query).await?;
    if !provider.supports_location(&location) {
        bail!("{} does not cover {}.", provider.id().display_name(), location.display_name());
    }

    let result = repository.get_weather(&location, Utc::now(), force).await?;

    if json {
        let json = serde_json::to_string_pretty(&result.weather)
            .context("Failed to serialize weather as JSON")?;
        println!("{json}");
    } else {
        output::print_weather(&location, &result, &config, Utc::now());
    }
    Ok(())
}

async fn alerts(place: Place) -> Result<()> {
    let config = Config::load()?;
    let provider = resolve_provider(&config, place.provider.as_deref())?;
    ensure_covered(provider.as_ref(), place.lat, place.lon)?;

    let repository = WeatherRepository::new(
        provider.as_ref(),
        WeatherCache::open_default()?,
        config.polling_interval(),
    );
    let location = locate(&repository, &LocationQuery::new(place.lat, place.lon)).await?;
    if !provider.supports_location(&location) {
        bail!("{} does not cover {}.", provider.id().display_name(), location.display_name());
    }

    match provider.get_alerts(&location).await? {
        None => println!("{} returned no alert data.", provider.id().display_name()),
        Some(alerts) => output::print_alerts(&location, &alerts),
    }
    Ok(())
}

fn trend(action: TrendAction) -> Result<()> {
    let mut config = Config::load()?;
    let list = &mut config.hourly_trend_display;

    match action {
        TrendAction::List => {
            for (i, tag) in list.tags().iter().enumerate() {
                println!("{:>2}. {tag}", i + 1);
            }
            let others = list.others();
            if !others.is_empty() {
                let hidden: Vec<&str> = others.iter().map(|t| t.as_str()).collect();
                println!("hidden: {}", hidden.join(", "));
            }
            return Ok(());
        }
        TrendAction::Add { tag } => {
            let tag = HourlyTrendDisplay::try_from(tag.as_str())?;
            if !list.insert(tag) {
                println!("'{tag}' is already shown.");
                return Ok(());
            }
        }
        TrendAction::Remove { tag } => {
            let tag = HourlyTrendDisplay::try_from(tag.as_str())?;
            let index = list.position(tag).ok_or_else(|| anyhow!("'{tag}' is not shown."))?;
            list.remove(index)?;
        }
        TrendAction::Move { from, to } => {
            if from == 0 || to == 0 {
                bail!("Positions start at 1.");
            }
            list.move_item(from - 1, to - 1)?;
        }
    }

    println!("hourly trends: {}", config.hourly_trend_display.to_value().replace('&', ", "));
    config.save()
}

fn sources() -> Result<()> {
    let config = Config::load()?;
    let default = config.default_provider_id().ok();

    for id in ProviderId::all() {
        let status = if !id.is_available() {
            "not in this build"
        } else if config.is_provider_configured(*id) {
            "ready"
        } else {
            "needs API key"
        };
        let marker = if default == Some(*id) { "*" } else { " " };
        println!("{marker} {:<8} {:<12} {status}", id.as_str(), id.display_name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_longitude() {
        let cli = Cli::try_parse_from([
            "skycast", "show", "--lat", "53.35", "--lon", "-6.26", "--provider", "metie",
            "--force",
        ])
        .unwrap();

        match cli.command {
            Command::Show { place, force, json, .. } => {
                assert_eq!(place.lon, -6.26);
                assert_eq!(place.provider.as_deref(), Some("metie"));
                assert!(force);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[cfg(feature = "metie")]
    #[test]
    fn coordinates_outside_coverage_are_rejected_before_lookup() {
        let provider = skycast_core::provider::metie::MetIeProvider::new();

        assert!(ensure_covered(&provider, 53.35, -6.26).is_ok());
        let err = ensure_covered(&provider, 48.85, 2.35).unwrap_err();
        assert!(err.to_string().contains("does not cover 48.8500, 2.3500"));
    }

    #[test]
    fn parses_trend_move() {
        let cli = Cli::try_parse_from(["skycast", "trend", "move", "3", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Trend { action: TrendAction::Move { from: 3, to: 1 } }
        ));
    }
}
