//! Query → geocode → forecast resolution.
//!
//! The pipeline owns the widget state. Every query mutation is persisted, then
//! resolved unless it is shorter than [`MIN_QUERY_CHARS`]. Attempts may overlap
//! (the caller can start a new one while an older one is still awaiting the
//! network); each attempt takes a ticket and only the holder of the latest
//! ticket may touch the state, so the widget always reflects the most recently
//! requested query rather than the most recently completed one.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    LookupError,
    model::{ResolvedLocation, WidgetState},
    provider::{ForecastSource, Geocoder},
    storage::QueryStore,
};

/// Queries shorter than this (in characters) never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// How a single resolution attempt ended.
#[derive(Debug)]
pub enum Resolution {
    /// The query was too short; nothing was requested and nothing changed.
    Skipped,
    /// Both lookups succeeded and the state now shows this place.
    Resolved(ResolvedLocation),
    /// A lookup failed. Previously shown data is left in place.
    Failed(LookupError),
    /// A newer attempt started while this one was in flight; its result was dropped.
    Superseded,
}

#[derive(Debug)]
pub struct ResolutionPipeline {
    geocoder: Box<dyn Geocoder>,
    forecast: Box<dyn ForecastSource>,
    store: Box<dyn QueryStore>,
    state: Mutex<WidgetState>,
    latest_ticket: AtomicU64,
}

impl ResolutionPipeline {
    /// Create the pipeline with the query restored from `store`.
    ///
    /// An unreadable store is logged and treated as "no query yet".
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        forecast: Box<dyn ForecastSource>,
        store: Box<dyn QueryStore>,
    ) -> Self {
        let query = store.load().unwrap_or_else(|err| {
            tracing::warn!("Could not restore last query: {err:#}");
            String::new()
        });

        Self {
            geocoder,
            forecast,
            store,
            state: Mutex::new(WidgetState { query, ..WidgetState::default() }),
            latest_ticket: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> WidgetState {
        self.state.lock().clone()
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    /// Resolve whatever query was restored at construction.
    pub async fn start(&self) -> Resolution {
        self.refresh().await
    }

    /// Re-resolve the current query.
    pub async fn refresh(&self) -> Resolution {
        let query = self.query();
        self.resolve(&query).await
    }

    /// Replace the query, persist it, and resolve it.
    pub async fn set_query(&self, query: impl Into<String>) -> Resolution {
        let query = query.into();

        if let Err(err) = self.store.save(&query) {
            tracing::warn!("Could not persist query: {err:#}");
        }
        self.state.lock().query = query.clone();

        self.resolve(&query).await
    }

    async fn resolve(&self, query: &str) -> Resolution {
        if query.chars().count() < MIN_QUERY_CHARS {
            tracing::debug!(query, "query too short; skipping lookup");
            return Resolution::Skipped;
        }

        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().loading = true;

        let place = match self.geocoder.resolve(query).await {
            Ok(place) => place,
            Err(err) => return self.finish(ticket, query, Resolution::Failed(err)),
        };

        {
            let mut state = self.state.lock();
            if !self.is_latest(ticket) {
                return self.superseded(ticket, query);
            }
            state.location = Some(place.location.clone());
        }

        let outcome = match self.forecast.forecast(&place.coordinates).await {
            Ok(series) => {
                let mut state = self.state.lock();
                if !self.is_latest(ticket) {
                    return self.superseded(ticket, query);
                }
                state.forecast = series;
                Resolution::Resolved(place.location)
            }
            Err(err) => Resolution::Failed(err),
        };

        self.finish(ticket, query, outcome)
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Clear the loading flag if this attempt is still the latest one.
    fn finish(&self, ticket: u64, query: &str, outcome: Resolution) -> Resolution {
        let mut state = self.state.lock();
        if !self.is_latest(ticket) {
            return self.superseded(ticket, query);
        }
        state.loading = false;
        outcome
    }

    fn superseded(&self, ticket: u64, query: &str) -> Resolution {
        tracing::warn!(ticket, query, "dropping result of superseded lookup");
        Resolution::Superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, DailyForecast, ForecastSeries, GeocodedPlace};
    use crate::storage::FileQueryStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Default)]
    struct Calls {
        geocode: AtomicUsize,
        forecast: AtomicUsize,
    }

    #[derive(Debug)]
    struct FakeGeocoder {
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn resolve(&self, query: &str) -> Result<GeocodedPlace, LookupError> {
            self.calls.geocode.fetch_add(1, Ordering::SeqCst);
            if query == "nowhere" {
                return Err(LookupError::NotFound { query: query.into() });
            }
            Ok(GeocodedPlace {
                location: ResolvedLocation {
                    display_name: query.into(),
                    country_code: "XX".into(),
                },
                coordinates: Coordinates {
                    latitude: 1.0,
                    longitude: 2.0,
                    timezone: if query == "stormy" { "fail".into() } else { "UTC".into() },
                },
            })
        }
    }

    #[derive(Debug)]
    struct FakeForecast {
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl ForecastSource for FakeForecast {
        async fn forecast(&self, coordinates: &Coordinates) -> Result<ForecastSeries, LookupError> {
            self.calls.forecast.fetch_add(1, Ordering::SeqCst);
            if coordinates.timezone == "fail" {
                return Err(LookupError::Malformed("boom".into()));
            }
            Ok(ForecastSeries::new(vec![DailyForecast {
                date: "2024-05-06".into(),
                weather_code: Some(0),
                temp_max: Some(20.0),
                temp_min: Some(10.0),
            }]))
        }
    }

    fn pipeline(dir: &tempfile::TempDir) -> (ResolutionPipeline, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let pipeline = ResolutionPipeline::new(
            Box::new(FakeGeocoder { calls: calls.clone() }),
            Box::new(FakeForecast { calls: calls.clone() }),
            Box::new(FileQueryStore::new(dir.path().join("state.toml"))),
        );
        (pipeline, calls)
    }

    #[tokio::test]
    async fn short_query_is_skipped_but_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let (p, calls) = pipeline(&dir);

        let outcome = p.set_query("B").await;

        assert!(matches!(outcome, Resolution::Skipped));
        assert_eq!(calls.geocode.load(Ordering::SeqCst), 0);
        assert_eq!(calls.forecast.load(Ordering::SeqCst), 0);
        assert_eq!(p.snapshot(), WidgetState { query: "B".into(), ..WidgetState::default() });

        let store = FileQueryStore::new(dir.path().join("state.toml"));
        assert_eq!(store.load().unwrap(), "B");
    }

    #[tokio::test]
    async fn two_character_multibyte_query_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let (p, calls) = pipeline(&dir);

        let outcome = p.set_query("Ås").await;

        assert!(matches!(outcome, Resolution::Resolved(_)));
        assert_eq!(calls.geocode.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_lookup_fills_state() {
        let dir = tempfile::tempdir().unwrap();
        let (p, _) = pipeline(&dir);

        let outcome = p.set_query("Oslo").await;
        let state = p.snapshot();

        assert!(matches!(outcome, Resolution::Resolved(ref loc) if loc.display_name == "Oslo"));
        assert!(!state.loading);
        assert_eq!(state.location.unwrap().display_name, "Oslo");
        assert_eq!(state.forecast.len(), 1);
    }

    #[tokio::test]
    async fn geocode_failure_keeps_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let (p, calls) = pipeline(&dir);
        p.set_query("Oslo").await;
        let before = p.snapshot();

        let outcome = p.set_query("nowhere").await;
        let after = p.snapshot();

        assert!(matches!(outcome, Resolution::Failed(ref e) if e.is_not_found()));
        assert!(!after.loading);
        assert_eq!(after.query, "nowhere");
        assert_eq!(after.location, before.location);
        assert_eq!(after.forecast, before.forecast);
        assert_eq!(calls.forecast.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forecast_failure_updates_location_only() {
        let dir = tempfile::tempdir().unwrap();
        let (p, _) = pipeline(&dir);
        p.set_query("Oslo").await;

        let outcome = p.set_query("stormy").await;
        let state = p.snapshot();

        assert!(matches!(outcome, Resolution::Failed(LookupError::Malformed(_))));
        assert!(!state.loading);
        assert_eq!(state.location.unwrap().display_name, "stormy");
        assert_eq!(state.forecast.len(), 1);
    }

    #[tokio::test]
    async fn start_resolves_restored_query() {
        let dir = tempfile::tempdir().unwrap();
        FileQueryStore::new(dir.path().join("state.toml")).save("Lima").unwrap();
        let (p, calls) = pipeline(&dir);

        assert_eq!(p.query(), "Lima");
        let outcome = p.start().await;

        assert!(matches!(outcome, Resolution::Resolved(_)));
        assert_eq!(calls.geocode.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_repeats_lookup_for_same_query() {
        let dir = tempfile::tempdir().unwrap();
        let (p, calls) = pipeline(&dir);
        p.set_query("Oslo").await;

        p.refresh().await;

        assert_eq!(calls.geocode.load(Ordering::SeqCst), 2);
        assert_eq!(p.query(), "Oslo");
    }
}
