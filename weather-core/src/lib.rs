//! Core library for the `weather` lookup widget.
//!
//! This crate defines:
//! - Configuration and durable storage of the last query
//! - Geocoding and forecast clients (Open-Meteo)
//! - The resolution pipeline that turns a query into widget state
//! - Pure helpers for icons, day labels and text rendering
//!
//! It is used by `weather-lookup`, but can also be reused by other front ends.

pub mod config;
pub mod day;
pub mod error;
pub mod icon;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod storage;

pub use config::{Config, Endpoints};
pub use error::LookupError;
pub use model::{
    Coordinates, DailyForecast, ForecastSeries, GeocodedPlace, ResolvedLocation, WidgetState,
};
pub use pipeline::{MIN_QUERY_CHARS, Resolution, ResolutionPipeline};
pub use provider::{ForecastSource, Geocoder, open_meteo_from_config};
pub use render::{DayCard, RenderOptions, day_cards, render};
pub use storage::{FileQueryStore, QueryStore};
