use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Default OpenWeather REST base.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather city ids for the bulk `/group` list view, in display order.
pub const DEFAULT_CITY_IDS: [u64; 10] = [
    2_643_743, // London
    5_128_581, // New York
    1_850_147, // Tokyo
    2_988_507, // Paris
    2_147_714, // Sydney
    2_950_159, // Berlin
    524_901,   // Moscow
    1_816_670, // Beijing
    3_451_190, // Rio de Janeiro
    360_630,   // Cairo
];

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # base_url = "https://api.openweathermap.org/data/2.5"
/// # city_ids = [2643743, 5128581]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key. The `OPENWEATHER_API_KEY` environment variable
    /// takes precedence over this field.
    pub api_key: Option<String>,

    /// Override for the API base URL (mainly for local mock servers).
    pub base_url: Option<String>,

    /// Override for the bulk list query. Order is preserved into the list view.
    pub city_ids: Option<Vec<u64>>,
}

impl Config {
    /// Resolve the API key, preferring the environment over the config file.
    pub fn resolved_api_key(&self) -> Result<String> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `skycast configure` or set the {API_KEY_ENV} environment variable."
            )
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn city_ids(&self) -> Vec<u64> {
        self.city_ids.clone().unwrap_or_else(|| DEFAULT_CITY_IDS.to_vec())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
