use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skycast_core::{Config, WeatherStore, source};
use std::sync::Arc;

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Browse current weather for popular cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured cities with current conditions.
    List,

    /// Show the detailed view for one city.
    Show {
        /// City name, e.g. "London".
        city: String,
    },

    /// Store the OpenWeather API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::List => {
                let store = build_store()?;
                let rendered = view::city_list(&store).await;
                println!("{rendered}");
                Ok(())
            }
            Command::Show { city } => {
                let store = build_store()?;
                let rendered = view::city_detail(&store, &city).await;
                println!("{rendered}");
                Ok(())
            }
        }
    }
}

fn build_store() -> Result<WeatherStore> {
    let config = Config::load()?;
    tracing::debug!(base_url = config.base_url(), "building weather store");
    let client = source::client_from_config(&config)?;
    Ok(WeatherStore::new(Arc::new(client)))
}

fn configure() -> Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.api_key = Some(key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
