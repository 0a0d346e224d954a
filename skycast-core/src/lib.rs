//! Core library for the `skycast` weather browser.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather API client behind a source abstraction
//! - Shared domain models (weather records, list items, detail cards)
//! - Pure unit/format converters and the detail-card builder
//! - A key-indexed query store with staleness and request de-duplication
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod cards;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod source;
pub mod store;

pub use cards::{CardItem, DetailCard, build_detail_cards};
pub use config::Config;
pub use error::ApiError;
pub use model::{WeatherListItem, WeatherRecord};
pub use source::{WeatherSource, openweather::OpenWeatherClient};
pub use store::{QueryData, QueryKey, QueryStatus, Snapshot, WeatherStore};
