use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::convert::round_temp;
use crate::error::ApiError;
use crate::model::{ApiErrorBody, WeatherListItem, WeatherRecord};
use serde::Deserialize;

use super::WeatherSource;

const CITY_FALLBACK_MESSAGE: &str = "Failed to fetch weather data";
const LIST_FALLBACK_MESSAGE: &str = "Failed to fetch weather list";

/// reqwest-backed client for the OpenWeather REST API.
///
/// Timeouts and connection handling are delegated entirely to reqwest;
/// this client only normalizes responses and failures.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    city_ids: Vec<u64>,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String, city_ids: Vec<u64>) -> Self {
        Self {
            base_url,
            api_key,
            city_ids,
            http: Client::new(),
        }
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Response, ApiError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, "requesting OpenWeather endpoint");

        self.http
            .get(&url)
            .query(query)
            .query(&[("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))
    }

    /// Turn a non-2xx response into an `Upstream` error, preferring the
    /// message from the error body over the endpoint's fallback.
    async fn upstream_error(res: Response, fallback: &str) -> ApiError {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();

        let (message, code) = match parsed {
            Some(ApiErrorBody { message: Some(message), cod }) => (message, cod),
            _ => {
                warn!(%status, "OpenWeather error body carried no message, using fallback");
                (fallback.to_string(), None)
            }
        };

        ApiError::upstream(message, code)
    }
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn city_weather(&self, city_name: &str) -> Result<WeatherRecord, ApiError> {
        let res = self.get("weather", &[("q", city_name)]).await?;

        if !res.status().is_success() {
            return Err(Self::upstream_error(res, CITY_FALLBACK_MESSAGE).await);
        }

        res.json::<WeatherRecord>()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))
    }

    async fn city_list(&self) -> Result<Vec<WeatherListItem>, ApiError> {
        let ids = self
            .city_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let res = self.get("group", &[("id", ids.as_str())]).await?;

        if !res.status().is_success() {
            return Err(Self::upstream_error(res, LIST_FALLBACK_MESSAGE).await);
        }

        let parsed = res
            .json::<GroupResponse>()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        Ok(map_list_items(parsed.list))
    }
}

// The `/group` endpoint returns full records, but the list view only needs a
// few fields; the wire structs stay lean so a sparse payload still maps.

#[derive(Debug, Deserialize)]
struct GroupResponse {
    list: Vec<GroupCity>,
}

#[derive(Debug, Deserialize)]
struct GroupCity {
    name: String,
    sys: GroupSys,
    main: GroupMain,
    weather: Vec<GroupCondition>,
}

#[derive(Debug, Deserialize)]
struct GroupSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct GroupMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct GroupCondition {
    description: String,
    icon: String,
}

/// Map bulk entries to list items, keeping API response order. Description
/// and icon come from each city's first weather-condition entry.
fn map_list_items(list: Vec<GroupCity>) -> Vec<WeatherListItem> {
    list.into_iter()
        .map(|city| {
            let condition = city.weather.into_iter().next();
            WeatherListItem {
                name: city.name,
                country: city.sys.country,
                temperature: round_temp(city.main.temp),
                description: condition
                    .as_ref()
                    .map(|c| c.description.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                icon: condition.map(|c| c.icon).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new(server.uri(), "test-key".to_string(), vec![2_643_743, 5_128_581])
    }

    fn london_payload() -> serde_json::Value {
        json!({
            "name": "London",
            "main": {
                "temp": 15.0,
                "feels_like": 13.0,
                "humidity": 75,
                "pressure": 1013,
                "temp_min": 12.0,
                "temp_max": 18.0
            },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "wind": { "speed": 5.2, "deg": 180 },
            "sys": { "country": "GB", "sunrise": 1640995200i64, "sunset": 1641024000i64 },
            "coord": { "lat": 51.5074, "lon": -0.1278 },
            "visibility": 10000,
            "clouds": { "all": 20 }
        })
    }

    #[tokio::test]
    async fn city_weather_returns_wire_shape_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
            .mount(&server)
            .await;

        let record = client_for(&server).city_weather("London").await.unwrap();
        assert_eq!(record.name, "London");
        assert_eq!(record.main.humidity, 75);
        assert_eq!(record.sys.country, "GB");
        assert_eq!(record.weather[0].icon, "01d");
        assert_eq!(record.clouds.all, 20);
    }

    #[tokio::test]
    async fn city_weather_propagates_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "message": "City not found", "cod": "404" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).city_weather("InvalidCity").await.unwrap_err();
        assert_eq!(err.to_string(), "City not found");
        assert!(matches!(err, ApiError::Upstream { code: Some(ref c), .. } if c == "404"));
    }

    #[tokio::test]
    async fn city_weather_falls_back_when_error_body_is_bare() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = client_for(&server).city_weather("London").await.unwrap_err();
        assert_eq!(err.to_string(), CITY_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_transport() {
        // Nothing listens on the discard port, so the request never completes.
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9".to_string(),
            "test-key".to_string(),
            vec![1],
        );

        let err = client.city_weather("London").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn city_list_maps_entries_in_response_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/group"))
            .and(query_param("id", "2643743,5128581"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {
                        "name": "London",
                        "sys": { "country": "GB" },
                        "main": { "temp": 15.2 },
                        "weather": [{ "description": "cloudy", "icon": "04d" }]
                    },
                    {
                        "name": "New York",
                        "sys": { "country": "US" },
                        "main": { "temp": 21.7 },
                        "weather": [{ "description": "sunny", "icon": "01d" }]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let items = client_for(&server).city_list().await.unwrap();
        assert_eq!(
            items,
            vec![
                WeatherListItem {
                    name: "London".to_string(),
                    country: "GB".to_string(),
                    temperature: 15,
                    description: "cloudy".to_string(),
                    icon: "04d".to_string(),
                },
                WeatherListItem {
                    name: "New York".to_string(),
                    country: "US".to_string(),
                    temperature: 22,
                    description: "sunny".to_string(),
                    icon: "01d".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn empty_city_list_is_a_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
            .mount(&server)
            .await;

        let items = client_for(&server).city_list().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn city_list_uses_its_own_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/group"))
            .respond_with(ResponseTemplate::new(502).set_body_string(""))
            .mount(&server)
            .await;

        let err = client_for(&server).city_list().await.unwrap_err();
        assert_eq!(err.to_string(), LIST_FALLBACK_MESSAGE);
    }

    #[test]
    fn missing_condition_entry_does_not_panic() {
        let items = map_list_items(vec![GroupCity {
            name: "Nowhere".to_string(),
            sys: GroupSys { country: "XX".to_string() },
            main: GroupMain { temp: 9.5 },
            weather: vec![],
        }]);

        assert_eq!(items[0].temperature, 10);
        assert_eq!(items[0].description, "Unknown");
        assert_eq!(items[0].icon, "");
    }
}
