use serde::{Deserialize, Serialize};

/// Canonical single-city weather snapshot, kept in the wire shape the
/// OpenWeather `/weather` endpoint returns (no field renaming). Immutable
/// once deserialized; a newer fetch replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub sys: Sys,
    pub coord: Coord,
    pub visibility: u32,
    pub clouds: Clouds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

/// Projection of a weather record for the list view. Derived at fetch time,
/// never independently mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherListItem {
    pub name: String,
    pub country: String,
    pub temperature: i64,
    pub description: String,
    pub icon: String,
}

/// Error body OpenWeather returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub cod: Option<String>,
}
