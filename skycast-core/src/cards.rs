//! Detail-card construction for the city detail view.
//!
//! Cards are display-ready strings derived from a [`WeatherRecord`]; they
//! carry no state of their own and are rebuilt on every render rather than
//! cached alongside the record.

use crate::convert::{compass_direction, format_clock_time, round_temp};
use crate::model::WeatherRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub label: String,
    pub value: String,
}

impl CardItem {
    fn new(label: &str, value: String) -> Self {
        Self { label: label.to_string(), value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCard {
    pub title: String,
    pub items: Vec<CardItem>,
}

impl DetailCard {
    fn new(title: &str, items: Vec<CardItem>) -> Self {
        Self { title: title.to_string(), items }
    }
}

/// Build the six detail cards for a record, in fixed order, two items each.
///
/// Total for any well-formed record: there is no error path, and a zero
/// visibility still renders as `0.0 km`.
pub fn build_detail_cards(record: &WeatherRecord) -> Vec<DetailCard> {
    vec![
        DetailCard::new(
            "Temperature Range",
            vec![
                CardItem::new("Min", format!("{}°C", round_temp(record.main.temp_min))),
                CardItem::new("Max", format!("{}°C", round_temp(record.main.temp_max))),
            ],
        ),
        DetailCard::new(
            "Humidity & Pressure",
            vec![
                CardItem::new("Humidity", format!("{}%", record.main.humidity)),
                CardItem::new("Pressure", format!("{} hPa", record.main.pressure)),
            ],
        ),
        DetailCard::new(
            "Wind",
            vec![
                CardItem::new("Speed", format!("{} m/s", record.wind.speed)),
                CardItem::new("Direction", compass_direction(record.wind.deg).to_string()),
            ],
        ),
        DetailCard::new(
            "Sun Times",
            vec![
                CardItem::new("Sunrise", format_clock_time(record.sys.sunrise)),
                CardItem::new("Sunset", format_clock_time(record.sys.sunset)),
            ],
        ),
        DetailCard::new(
            "Location",
            vec![
                CardItem::new("Latitude", format!("{}°", record.coord.lat)),
                CardItem::new("Longitude", format!("{}°", record.coord.lon)),
            ],
        ),
        DetailCard::new(
            "Visibility & Clouds",
            vec![
                CardItem::new("Visibility", format!("{:.1} km", f64::from(record.visibility) / 1000.0)),
                CardItem::new("Cloud Coverage", format!("{}%", record.clouds.all)),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clouds, Condition, Coord, MainReadings, Sys, WeatherRecord, Wind};

    fn london() -> WeatherRecord {
        WeatherRecord {
            name: "London".to_string(),
            main: MainReadings {
                temp: 15.0,
                feels_like: 13.0,
                humidity: 75,
                pressure: 1013,
                temp_min: 12.4,
                temp_max: 18.6,
            },
            weather: vec![Condition {
                id: 800,
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            wind: Wind { speed: 5.2, deg: 180.0 },
            sys: Sys {
                country: "GB".to_string(),
                sunrise: 1_640_995_200,
                sunset: 1_641_024_000,
            },
            coord: Coord { lat: 51.5074, lon: -0.1278 },
            visibility: 10_000,
            clouds: Clouds { all: 20 },
        }
    }

    #[test]
    fn six_cards_of_two_items_in_fixed_order() {
        let cards = build_detail_cards(&london());
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();

        assert_eq!(
            titles,
            [
                "Temperature Range",
                "Humidity & Pressure",
                "Wind",
                "Sun Times",
                "Location",
                "Visibility & Clouds",
            ]
        );
        for card in &cards {
            assert_eq!(card.items.len(), 2, "card {:?}", card.title);
        }
    }

    #[test]
    fn temperatures_round_and_carry_unit() {
        let cards = build_detail_cards(&london());
        assert_eq!(cards[0].items[0].value, "12°C");
        assert_eq!(cards[0].items[1].value, "19°C");
    }

    #[test]
    fn humidity_pressure_and_clouds_formatting() {
        let cards = build_detail_cards(&london());
        assert_eq!(cards[1].items[0].value, "75%");
        assert_eq!(cards[1].items[1].value, "1013 hPa");
        assert_eq!(cards[5].items[1].value, "20%");
    }

    #[test]
    fn wind_speed_is_not_rounded() {
        let cards = build_detail_cards(&london());
        assert_eq!(cards[2].items[0].value, "5.2 m/s");
        assert_eq!(cards[2].items[1].value, "S");
    }

    #[test]
    fn coordinates_render_raw() {
        let cards = build_detail_cards(&london());
        assert_eq!(cards[4].items[0].value, "51.5074°");
        assert_eq!(cards[4].items[1].value, "-0.1278°");
    }

    #[test]
    fn visibility_always_one_decimal_km() {
        let mut record = london();
        assert_eq!(build_detail_cards(&record)[5].items[0].value, "10.0 km");

        record.visibility = 5_000;
        assert_eq!(build_detail_cards(&record)[5].items[0].value, "5.0 km");

        record.visibility = 0;
        assert_eq!(build_detail_cards(&record)[5].items[0].value, "0.0 km");

        record.visibility = 1_234;
        assert_eq!(build_detail_cards(&record)[5].items[0].value, "1.2 km");
    }

    #[test]
    fn sun_times_use_clock_format() {
        let cards = build_detail_cards(&london());
        for item in &cards[3].items {
            assert!(
                item.value.ends_with("AM") || item.value.ends_with("PM"),
                "unexpected time {:?}",
                item.value
            );
            assert!(item.value.contains(':'));
        }
    }
}
