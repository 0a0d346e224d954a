//! Text rendering for the list and detail views.
//!
//! The async functions drive the query store (ensure, then wait for the
//! fetch to settle); the formatters below them are pure so the empty, error
//! and no-data states can be tested without a store.

use skycast_core::{
    ApiError, QueryData, QueryKey, QueryStatus, Snapshot, WeatherStore, build_detail_cards,
    convert::round_temp,
};
use std::fmt::Write;

/// Fetch (or reuse) the city list and render it.
pub async fn city_list(store: &WeatherStore) -> String {
    let key = QueryKey::CityList;
    store.ensure(&key);
    store.wait_settled(&key).await;
    format_list(&store.get(&key))
}

/// Fetch (or reuse) one city and render the detail view.
pub async fn city_detail(store: &WeatherStore, city: &str) -> String {
    let city = city.trim();
    if city.is_empty() {
        // Distinct from a failed fetch: no usable city key was given at all.
        return "No city selected. Usage: skycast show <city>".to_string();
    }

    let key = QueryKey::city(city);
    store.ensure(&key);
    store.wait_settled(&key).await;
    format_detail(city, &store.get(&key))
}

fn format_list(snapshot: &Snapshot) -> String {
    match snapshot.status {
        QueryStatus::Fetching => "Loading cities...".to_string(),
        QueryStatus::Failed => {
            let message = error_message(snapshot);
            format!("Could not load the city list: {message}")
        }
        _ => match &snapshot.data {
            Some(QueryData::List(items)) if items.is_empty() => {
                // An empty successful response is not an error.
                "No cities to show right now.".to_string()
            }
            Some(QueryData::List(items)) => {
                let mut out = String::new();
                for item in items {
                    let _ = writeln!(
                        out,
                        "{}, {}  {}°C  {} ({})",
                        item.name, item.country, item.temperature, item.description, item.icon
                    );
                }
                out.trim_end().to_string()
            }
            _ => "No cities to show right now.".to_string(),
        },
    }
}

fn format_detail(city: &str, snapshot: &Snapshot) -> String {
    match snapshot.status {
        QueryStatus::Fetching => format!("Loading weather for {city}..."),
        QueryStatus::Failed => {
            let message = error_message(snapshot);
            format!("Could not load weather for '{city}': {message}")
        }
        _ => match &snapshot.data {
            Some(QueryData::Record(record)) => {
                let mut out = String::new();
                let _ = writeln!(out, "{}, {}", record.name, record.sys.country);
                let condition = record
                    .weather
                    .first()
                    .map(|c| c.description.as_str())
                    .unwrap_or("Unknown");
                let _ = writeln!(out, "{}°C ({condition})", round_temp(record.main.temp));
                let _ = writeln!(out, "Feels like {}°C", round_temp(record.main.feels_like));

                for card in build_detail_cards(record) {
                    let _ = writeln!(out, "\n{}", card.title);
                    for item in card.items {
                        let _ = writeln!(out, "  {}: {}", item.label, item.value);
                    }
                }
                out.trim_end().to_string()
            }
            // The fetch settled successfully but left nothing to render.
            _ => format!("{} for '{city}'.", ApiError::EmptyResult),
        },
    }
}

fn error_message(snapshot: &Snapshot) -> String {
    snapshot
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown error".to_string())
}
