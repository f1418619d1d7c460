use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{fmt, time::Duration};

use crate::{
    config::Config,
    error::LookupError,
    model::{Condition, CurrentConditions, ForecastQuery, ForecastResult, HourlyEntry, Location},
};

use super::ForecastSource;

/// Client for the WeatherAPI.com `forecast.json` endpoint.
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherApiClient {
    pub fn new(api_key: String, endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, endpoint: endpoint.into(), http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_owned();
        Self::new(api_key, config.endpoint.clone(), config.timeout())
    }

    /// Look up `city`. Blank input fails with [`LookupError::EmptyInput`] without a request.
    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastResult, LookupError> {
        let query = ForecastQuery::new(city)?;
        self.fetch(&query).await
    }

    async fn request(&self, query: &ForecastQuery) -> Result<ForecastResult, LookupError> {
        tracing::debug!(city = %query, endpoint = %self.endpoint, "requesting forecast");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.city()),
                ("days", "2"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(city = %query, error = %e, "forecast request failed");
                LookupError::from_transport(e)
            })?;

        let status = res.status();
        tracing::debug!(city = %query, %status, "forecast response received");

        if let Some(err) = classify_status(status) {
            // The status alone decides the error; the body is only logged.
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(city = %query, %status, body = %truncate_body(&body), "forecast rejected");
            return Err(err);
        }

        let body = res.text().await.map_err(|e| {
            tracing::warn!(city = %query, error = %e, "failed to read forecast body");
            LookupError::from_transport(e)
        })?;

        parse_body(&body)
    }
}

#[async_trait]
impl ForecastSource for WeatherApiClient {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResult, LookupError> {
        self.request(query).await
    }
}

/// `None` for success statuses, otherwise the matching failure kind.
fn classify_status(status: StatusCode) -> Option<LookupError> {
    if status.is_success() {
        return None;
    }

    Some(match status.as_u16() {
        400 => LookupError::CityNotFound,
        401 | 403 => LookupError::InvalidCredential,
        other => LookupError::ApiError(other),
    })
}

fn parse_body(body: &str) -> Result<ForecastResult, LookupError> {
    let parsed: WaResponse = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, body = %truncate_body(body), "failed to parse forecast JSON");
        LookupError::MalformedResponse
    })?;

    let days = parsed.forecast.and_then(|f| f.forecastday).ok_or_else(|| {
        tracing::warn!("forecast response has no forecastday section");
        LookupError::MalformedResponse
    })?;

    // Later days are ignored even when present.
    let hours = days
        .into_iter()
        .next()
        .and_then(|day| day.hour)
        .unwrap_or_default()
        .into_iter()
        .map(HourlyEntry::from)
        .collect();

    Ok(ForecastResult {
        location: parsed.location.into(),
        current: parsed.current.into(),
        hours,
    })
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    humidity: u8,
    wind_kph: f64,
    pressure_mb: f64,
    uv: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    temp_f: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Option<Vec<WaForecastHour>>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Option<Vec<WaForecastDay>>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: Option<WaForecast>,
}

impl From<WaLocation> for Location {
    fn from(l: WaLocation) -> Self {
        Self { name: l.name, region: l.region, country: l.country }
    }
}

impl From<WaCondition> for Condition {
    fn from(c: WaCondition) -> Self {
        Self { text: c.text, icon: c.icon }
    }
}

impl From<WaCurrent> for CurrentConditions {
    fn from(c: WaCurrent) -> Self {
        Self {
            temp_c: c.temp_c,
            temp_f: c.temp_f,
            feelslike_c: c.feelslike_c,
            feelslike_f: c.feelslike_f,
            humidity: c.humidity,
            wind_kph: c.wind_kph,
            pressure_mb: c.pressure_mb,
            uv: c.uv,
            condition: c.condition.into(),
        }
    }
}

impl From<WaForecastHour> for HourlyEntry {
    fn from(h: WaForecastHour) -> Self {
        Self { time: h.time, temp_c: h.temp_c, temp_f: h.temp_f, condition: h.condition.into() }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(forecast: serde_json::Value) -> String {
        json!({
            "location": { "name": "Rochester", "region": "New York", "country": "USA" },
            "current": {
                "temp_c": 20.0, "temp_f": 68.0,
                "feelslike_c": 19.4, "feelslike_f": 66.9,
                "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png" },
                "humidity": 40, "wind_kph": 13.0, "pressure_mb": 1015.0, "uv": 5.0
            },
            "forecast": forecast
        })
        .to_string()
    }

    #[test]
    fn status_classification() {
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(matches!(classify_status(StatusCode::BAD_REQUEST), Some(LookupError::CityNotFound)));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(LookupError::InvalidCredential)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN),
            Some(LookupError::InvalidCredential)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND),
            Some(LookupError::ApiError(404))
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY),
            Some(LookupError::ApiError(502))
        ));
    }

    #[test]
    fn only_first_forecast_day_is_kept() {
        let hour = |time: &str| {
            json!({ "time": time, "temp_c": 1.0, "temp_f": 33.8,
                    "condition": { "text": "Clear", "icon": "//x/1.png" } })
        };
        let text = body(json!({ "forecastday": [
            { "hour": [hour("2025-10-01 00:00"), hour("2025-10-01 01:00")] },
            { "hour": [hour("2025-10-02 00:00")] }
        ]}));

        let result = parse_body(&text).expect("valid body");

        assert_eq!(result.hours.len(), 2);
        assert!(result.hours.iter().all(|h| h.time.starts_with("2025-10-01")));
        assert_eq!(result.location.region, "New York");
        assert_eq!(result.current.humidity, 40);
    }

    #[test]
    fn missing_forecast_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(&body(json!(null))).unwrap();
        value.as_object_mut().unwrap().remove("forecast");

        assert!(matches!(
            parse_body(&value.to_string()),
            Err(LookupError::MalformedResponse)
        ));
    }

    #[test]
    fn missing_forecastday_is_malformed() {
        assert!(matches!(parse_body(&body(json!({}))), Err(LookupError::MalformedResponse)));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(parse_body("<html>oops</html>"), Err(LookupError::MalformedResponse)));
    }

    #[test]
    fn empty_forecastday_gives_empty_hours() {
        let result = parse_body(&body(json!({ "forecastday": [] }))).expect("valid body");
        assert!(result.hours.is_empty());
    }

    #[test]
    fn day_without_hour_list_gives_empty_hours() {
        let result = parse_body(&body(json!({ "forecastday": [{}] }))).expect("valid body");
        assert!(result.hours.is_empty());

        let view = crate::render::render(
            &result,
            crate::model::DisplayUnit::Celsius,
            chrono::Local::now().naive_local(),
        )
        .expect("renders");
        assert_eq!(view.hourly, crate::render::HourlyDisplay::NotAvailable);
    }

    #[test]
    fn truncate_long_body() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);

        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client =
            WeatherApiClient::new("SECRET".into(), "http://localhost/", Duration::from_secs(1))
                .expect("client builds");

        assert!(!format!("{client:?}").contains("SECRET"));
    }
}
