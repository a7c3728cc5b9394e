use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    error::{LookupError, truncate_body},
    model::{Coordinates, DailyForecast, ForecastSeries, GeocodedPlace, ResolvedLocation},
};

use super::{ForecastSource, Geocoder};

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OmGeoResult {
    latitude: f64,
    longitude: f64,
    timezone: String,
    name: String,
    #[serde(default)]
    country_code: String,
}

#[derive(Debug, Deserialize)]
struct OmGeoResponse {
    results: Option<Vec<OmGeoResult>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weathercode: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, query: &str) -> Result<GeocodedPlace, LookupError> {
        tracing::debug!(query, url = %self.url, "geocoding");

        let req = self.http.get(&self.url).query(&[("name", query)]);
        let parsed: OmGeoResponse = fetch_json(req, "geocoding").await?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| LookupError::NotFound { query: query.to_string() })?;

        tracing::info!(name = %first.name, country = %first.country_code, "resolved place");

        Ok(GeocodedPlace {
            location: ResolvedLocation {
                display_name: first.name,
                country_code: first.country_code,
            },
            coordinates: Coordinates {
                latitude: first.latitude,
                longitude: first.longitude,
                timezone: first.timezone,
            },
        })
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn forecast(&self, coordinates: &Coordinates) -> Result<ForecastSeries, LookupError> {
        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            timezone = %coordinates.timezone,
            "fetching forecast"
        );

        let req = self.http.get(&self.url).query(&[
            ("latitude", coordinates.latitude.to_string().as_str()),
            ("longitude", coordinates.longitude.to_string().as_str()),
            ("timezone", coordinates.timezone.as_str()),
            ("daily", DAILY_FIELDS),
        ]);
        let parsed: OmForecastResponse = fetch_json(req, "forecast").await?;

        zip_daily(parsed.daily)
    }
}

async fn fetch_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
    what: &str,
) -> Result<T, LookupError> {
    let res = req.send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(LookupError::Upstream { status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body)
        .map_err(|e| LookupError::Malformed(format!("Failed to parse {what} JSON: {e}")))
}

/// Fold the four parallel daily arrays into one entry per day.
fn zip_daily(daily: OmDaily) -> Result<ForecastSeries, LookupError> {
    let len = daily.time.len();
    if daily.weathercode.len() != len
        || daily.temperature_2m_max.len() != len
        || daily.temperature_2m_min.len() != len
    {
        return Err(LookupError::Malformed(format!(
            "daily arrays differ in length: time={}, weathercode={}, max={}, min={}",
            len,
            daily.weathercode.len(),
            daily.temperature_2m_max.len(),
            daily.temperature_2m_min.len(),
        )));
    }

    let days = daily
        .time
        .into_iter()
        .zip(daily.weathercode)
        .zip(daily.temperature_2m_max)
        .zip(daily.temperature_2m_min)
        .map(|(((date, weather_code), temp_max), temp_min)| DailyForecast {
            date,
            weather_code,
            temp_max,
            temp_min,
        })
        .collect();

    Ok(ForecastSeries::new(days))
}
