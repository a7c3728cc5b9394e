use serde::{Deserialize, Serialize};

/// Place metadata shown next to the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub display_name: String,
    pub country_code: String,
}

/// Where to ask for a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// A geocoding hit: what to display plus where to look.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub location: ResolvedLocation,
    pub coordinates: Coordinates,
}

/// One day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Calendar date as returned upstream, e.g. `2024-05-01`.
    pub date: String,
    /// `None` where upstream had no value for the day.
    pub weather_code: Option<i32>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

/// Ordered per-day forecast. Replaced wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    days: Vec<DailyForecast>,
}

impl ForecastSeries {
    pub fn new(days: Vec<DailyForecast>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DailyForecast] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Everything the renderer needs, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    pub query: String,
    pub loading: bool,
    pub location: Option<ResolvedLocation>,
    pub forecast: ForecastSeries,
}
