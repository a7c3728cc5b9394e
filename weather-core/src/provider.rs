use crate::{
    Config, LookupError,
    model::{Coordinates, ForecastSeries, GeocodedPlace},
    provider::open_meteo::{OpenMeteoForecast, OpenMeteoGeocoder},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Turns free text into a place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// First upstream candidate for `query`, or `LookupError::NotFound`.
    async fn resolve(&self, query: &str) -> Result<GeocodedPlace, LookupError>;
}

/// Fetches the daily forecast for a place.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(&self, coordinates: &Coordinates) -> Result<ForecastSeries, LookupError>;
}

/// Build both Open-Meteo clients from the configured endpoints.
pub fn open_meteo_from_config(
    config: &Config,
) -> anyhow::Result<(Box<dyn Geocoder>, Box<dyn ForecastSource>)> {
    config.validate()?;

    let geocoder: Box<dyn Geocoder> =
        Box::new(OpenMeteoGeocoder::new(config.endpoints.geocoding_url.clone()));
    let forecast: Box<dyn ForecastSource> =
        Box::new(OpenMeteoForecast::new(config.endpoints.forecast_url.clone()));

    Ok((geocoder, forecast))
}
