use crate::{Config, error::ApiError, model::{WeatherListItem, WeatherRecord}};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Abstraction over the upstream weather data source.
///
/// The query store talks to this trait rather than to reqwest directly,
/// which is also what makes the de-duplication and failure paths testable
/// without a network.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions for a single city, by name.
    async fn city_weather(&self, city_name: &str) -> Result<WeatherRecord, ApiError>;

    /// One bulk request for the configured city set, mapped to list items
    /// in API response order.
    async fn city_list(&self) -> Result<Vec<WeatherListItem>, ApiError>;
}

/// Construct the OpenWeather client from config and the resolved API key.
pub fn client_from_config(config: &Config) -> anyhow::Result<openweather::OpenWeatherClient> {
    let api_key = config.resolved_api_key()?;
    Ok(openweather::OpenWeatherClient::new(
        config.base_url().to_owned(),
        api_key,
        config.city_ids(),
    ))
}
