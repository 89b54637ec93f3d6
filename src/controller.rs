//! Top-level search orchestration
//!
//! Owns the application state rendered by the views and wires the three
//! weather flows: submit-by-name, select-by-coordinate, and the one-shot
//! geolocation lookup at startup. Overlapping flows are serialized logically,
//! not with locks held across awaits: every flow takes a monotonically
//! increasing sequence number and only the newest one may write its result
//! into the state. A superseded flow leaves the loading flag alone; the flow
//! that superseded it owns the flag for its own duration.

use crate::forecast::ForecastFetcher;
use crate::geocode::{GeoResolver, Geocoder, MIN_QUERY_LEN, NameResolution};
use crate::geolocate::GeolocationSource;
use crate::models::{Location, Place, WeatherSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Application state rendered by the views
///
/// `weather == None` with `is_loading == false` is the idle state shown
/// until the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Latest weather snapshot, replaced wholesale on success
    pub weather: Option<WeatherSnapshot>,
    /// Display label for the weather header
    pub location: Option<Location>,
    /// Whether a weather flow is in progress
    pub is_loading: bool,
}

/// Result of a search flow, for the caller's notice handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Input too short or capability absent; nothing happened
    Skipped,
    /// Zero geocoding results; show a "not found" notice
    NotFound,
    /// Weather and location committed
    Updated,
    /// Network or parse failure; logged, no user-visible message
    FetchFailed,
    /// A newer flow took over; this result was discarded
    Superseded,
}

/// Orchestrator for the search and weather flows
pub struct SearchController {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastFetcher>,
    state: Arc<Mutex<AppState>>,
    seq: AtomicU64,
}

impl SearchController {
    /// Create a new controller in the idle state
    #[must_use]
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastFetcher>) -> Self {
        Self {
            geocoder,
            forecast,
            state: Arc::new(Mutex::new(AppState::default())),
            seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current application state
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    /// Submit free text: geocode the name, then fetch weather
    pub async fn submit_by_name(&self, text: &str) -> SearchOutcome {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            debug!("Ignoring short search input: {:?}", text);
            return SearchOutcome::Skipped;
        }

        let seq = self.begin();
        match GeoResolver::resolve_name(self.geocoder.as_ref(), trimmed).await {
            Ok(NameResolution::Found(place)) => {
                info!(
                    "Resolved '{}' to {} ({:.4}, {:.4})",
                    trimmed, place.name, place.latitude, place.longitude
                );
                self.commit(seq, |state| state.location = Some(Location::from(&place)));
                self.fetch_weather(seq, place.latitude, place.longitude, false)
                    .await
            }
            Ok(NameResolution::NotFound) => {
                self.finish(seq);
                SearchOutcome::NotFound
            }
            Ok(NameResolution::Skipped) => {
                self.finish(seq);
                SearchOutcome::Skipped
            }
            Err(e) => {
                warn!("City search failed for '{}': {}", trimmed, e);
                self.finish(seq);
                SearchOutcome::FetchFailed
            }
        }
    }

    /// Fetch weather for an already-resolved suggestion
    ///
    /// The label keeps only the suggestion's name; the country is dropped on
    /// this path since the user already disambiguated via the list.
    pub async fn select_suggestion(&self, place: &Place) -> SearchOutcome {
        let seq = self.begin();
        self.commit(seq, |state| {
            state.location = Some(Location::new(place.name.clone()));
        });
        self.fetch_weather(seq, place.latitude, place.longitude, false)
            .await
    }

    /// One-shot device-geolocation lookup at startup
    ///
    /// Absent capability, denial, or failure is a silent no-op. On success
    /// the flow carries no label, so the location is populated by reverse
    /// geocoding after the weather arrives.
    pub async fn initial_geolocation(&self, source: &dyn GeolocationSource) -> SearchOutcome {
        if !source.is_available() {
            debug!("No geolocation capability; skipping initial lookup");
            return SearchOutcome::Skipped;
        }

        match source.current_position().await {
            Ok(coords) => {
                info!(
                    "Initial geolocation at ({:.4}, {:.4})",
                    coords.latitude, coords.longitude
                );
                let seq = self.begin();
                self.fetch_weather(seq, coords.latitude, coords.longitude, true)
                    .await
            }
            Err(e) => {
                warn!("Geolocation denied or failed: {}", e);
                SearchOutcome::Skipped
            }
        }
    }

    /// Fetch and commit a weather snapshot, reverse-geocoding the label when
    /// the flow carries none
    async fn fetch_weather(
        &self,
        seq: u64,
        latitude: f64,
        longitude: f64,
        reverse: bool,
    ) -> SearchOutcome {
        match self.forecast.fetch(latitude, longitude).await {
            Ok(snapshot) => {
                let committed = self.commit(seq, |state| state.weather = Some(snapshot));
                if !committed {
                    debug!("Weather result superseded by a newer flow");
                    return SearchOutcome::Superseded;
                }

                if reverse {
                    // Unknown reverse results leave the location unset;
                    // weather still renders
                    if let Some(location) =
                        GeoResolver::resolve_coordinates(self.geocoder.as_ref(), latitude, longitude)
                            .await
                    {
                        self.commit(seq, |state| state.location = Some(location));
                    }
                }

                self.finish(seq);
                SearchOutcome::Updated
            }
            Err(e) => {
                warn!(
                    "Weather fetch failed for ({:.4}, {:.4}): {}",
                    latitude, longitude, e
                );
                self.finish(seq);
                SearchOutcome::FetchFailed
            }
        }
    }

    /// Start a flow: claim the next sequence number and raise the loading flag
    fn begin(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().unwrap().is_loading = true;
        seq
    }

    /// Apply a state mutation if `seq` is still the newest flow
    fn commit(&self, seq: u64, apply: impl FnOnce(&mut AppState)) -> bool {
        let mut state = self.state.lock().unwrap();
        if self.seq.load(Ordering::SeqCst) != seq {
            return false;
        }
        apply(&mut state);
        true
    }

    /// Clear the loading flag if `seq` still owns it
    fn finish(&self, seq: u64) {
        let mut state = self.state.lock().unwrap();
        if self.seq.load(Ordering::SeqCst) == seq {
            state.is_loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::SkycastError;
    use crate::geolocate::{FixedPosition, Unavailable};
    use crate::models::{CurrentConditions, DailyForecast, HourlyForecast};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    fn snapshot(temperature: f32) -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                temperature,
                humidity: 50,
                wind_speed: 10.0,
                weather_code: 1,
            },
            hourly: HourlyForecast::default(),
            daily: DailyForecast::default(),
        }
    }

    fn paris() -> Place {
        Place {
            name: "Paris".to_string(),
            country: Some("France".to_string()),
            admin1: Some("Ile-de-France".to_string()),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    /// Geocoder with canned search/reverse results and call recording
    #[derive(Default)]
    struct CannedGeocoder {
        search_results: HashMap<String, Vec<Place>>,
        reverse_results: Vec<Location>,
        search_calls: Mutex<Vec<String>>,
        reverse_calls: Mutex<Vec<(f64, f64)>>,
    }

    #[async_trait]
    impl Geocoder for CannedGeocoder {
        async fn search(&self, query: &str, _count: u32) -> Result<Vec<Place>> {
            self.search_calls.lock().unwrap().push(query.to_string());
            Ok(self.search_results.get(query).cloned().unwrap_or_default())
        }

        async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Vec<Location>> {
            self.reverse_calls.lock().unwrap().push((latitude, longitude));
            Ok(self.reverse_results.clone())
        }
    }

    enum FetchScript {
        Respond(WeatherSnapshot, Duration),
        Fail,
    }

    /// Forecast fetcher with scripted per-coordinate responses
    #[derive(Default)]
    struct CannedForecast {
        scripts: HashMap<String, FetchScript>,
        calls: Mutex<Vec<(f64, f64)>>,
    }

    impl CannedForecast {
        fn key(latitude: f64, longitude: f64) -> String {
            format!("{latitude},{longitude}")
        }

        fn respond(mut self, latitude: f64, longitude: f64, snapshot: WeatherSnapshot) -> Self {
            self.scripts.insert(
                Self::key(latitude, longitude),
                FetchScript::Respond(snapshot, Duration::ZERO),
            );
            self
        }

        fn respond_after(
            mut self,
            latitude: f64,
            longitude: f64,
            snapshot: WeatherSnapshot,
            delay: Duration,
        ) -> Self {
            self.scripts.insert(
                Self::key(latitude, longitude),
                FetchScript::Respond(snapshot, delay),
            );
            self
        }

        fn fail(mut self, latitude: f64, longitude: f64) -> Self {
            self.scripts
                .insert(Self::key(latitude, longitude), FetchScript::Fail);
            self
        }

        fn calls(&self) -> Vec<(f64, f64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ForecastFetcher for CannedForecast {
        async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
            self.calls.lock().unwrap().push((latitude, longitude));
            match self.scripts.get(&Self::key(latitude, longitude)) {
                Some(FetchScript::Respond(snapshot, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                    Ok(snapshot.clone())
                }
                Some(FetchScript::Fail) | None => Err(SkycastError::fetch("scripted failure")),
            }
        }
    }

    fn controller(
        geocoder: CannedGeocoder,
        forecast: CannedForecast,
    ) -> (SearchController, Arc<CannedGeocoder>, Arc<CannedForecast>) {
        let geocoder = Arc::new(geocoder);
        let forecast = Arc::new(forecast);
        let controller = SearchController::new(
            Arc::clone(&geocoder) as Arc<dyn Geocoder>,
            Arc::clone(&forecast) as Arc<dyn ForecastFetcher>,
        );
        (controller, geocoder, forecast)
    }

    #[tokio::test]
    async fn test_short_input_is_a_noop() {
        let (controller, geocoder, forecast) =
            controller(CannedGeocoder::default(), CannedForecast::default());

        assert_eq!(controller.submit_by_name(" p ").await, SearchOutcome::Skipped);

        let state = controller.state();
        assert!(!state.is_loading);
        assert!(state.weather.is_none());
        assert!(geocoder.search_calls.lock().unwrap().is_empty());
        assert!(forecast.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let geocoder = CannedGeocoder {
            search_results: HashMap::from([("Paris".to_string(), vec![paris()])]),
            ..Default::default()
        };
        let forecast = CannedForecast::default().respond(48.85, 2.35, snapshot(18.0));
        let (controller, _, forecast) = controller(geocoder, forecast);

        assert_eq!(controller.submit_by_name("Paris").await, SearchOutcome::Updated);

        assert_eq!(forecast.calls(), vec![(48.85, 2.35)]);
        let state = controller.state();
        assert_eq!(state.location, Some(Location::with_country("Paris", "France")));
        assert_eq!(state.weather.as_ref().unwrap().current.temperature, 18.0);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_not_found_keeps_previous_weather() {
        let geocoder = CannedGeocoder {
            search_results: HashMap::from([("Paris".to_string(), vec![paris()])]),
            ..Default::default()
        };
        let forecast = CannedForecast::default().respond(48.85, 2.35, snapshot(18.0));
        let (controller, _, _) = controller(geocoder, forecast);

        controller.submit_by_name("Paris").await;
        let before = controller.state();

        assert_eq!(
            controller.submit_by_name("Nowhereville").await,
            SearchOutcome::NotFound
        );

        let after = controller.state();
        assert_eq!(after.weather, before.weather);
        assert!(!after.is_loading);
    }

    #[tokio::test]
    async fn test_select_suggestion_uses_name_only() {
        let forecast = CannedForecast::default().respond(48.85, 2.35, snapshot(18.0));
        let (controller, geocoder, _) = controller(CannedGeocoder::default(), forecast);

        assert_eq!(
            controller.select_suggestion(&paris()).await,
            SearchOutcome::Updated
        );

        let state = controller.state();
        // Country dropped on the selection path
        assert_eq!(state.location, Some(Location::new("Paris")));
        assert!(state.weather.is_some());
        assert!(geocoder.search_calls.lock().unwrap().is_empty());
        assert!(geocoder.reverse_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_loading_and_keeps_weather() {
        let geocoder = CannedGeocoder {
            search_results: HashMap::from([
                ("Paris".to_string(), vec![paris()]),
                (
                    "Brokentown".to_string(),
                    vec![Place {
                        name: "Brokentown".to_string(),
                        country: None,
                        admin1: None,
                        latitude: 1.0,
                        longitude: 1.0,
                    }],
                ),
            ]),
            ..Default::default()
        };
        let forecast = CannedForecast::default()
            .respond(48.85, 2.35, snapshot(18.0))
            .fail(1.0, 1.0);
        let (controller, _, _) = controller(geocoder, forecast);

        controller.submit_by_name("Paris").await;
        assert_eq!(
            controller.submit_by_name("Brokentown").await,
            SearchOutcome::FetchFailed
        );

        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.weather.as_ref().unwrap().current.temperature, 18.0);
    }

    #[tokio::test]
    async fn test_geolocation_unavailable_is_a_noop() {
        let (controller, geocoder, forecast) =
            controller(CannedGeocoder::default(), CannedForecast::default());

        assert_eq!(
            controller.initial_geolocation(&Unavailable).await,
            SearchOutcome::Skipped
        );

        let state = controller.state();
        assert_eq!(state, AppState::default());
        assert!(geocoder.reverse_calls.lock().unwrap().is_empty());
        assert!(forecast.calls().is_empty());
    }

    #[tokio::test]
    async fn test_geolocation_success_reverse_geocodes_label() {
        let geocoder = CannedGeocoder {
            reverse_results: vec![Location::with_country("London", "United Kingdom")],
            ..Default::default()
        };
        let forecast = CannedForecast::default().respond(51.5, -0.12, snapshot(14.0));
        let (controller, geocoder, forecast) = controller(geocoder, forecast);

        let outcome = controller
            .initial_geolocation(&FixedPosition::new(51.5, -0.12))
            .await;
        assert_eq!(outcome, SearchOutcome::Updated);

        assert_eq!(forecast.calls(), vec![(51.5, -0.12)]);
        assert_eq!(*geocoder.reverse_calls.lock().unwrap(), vec![(51.5, -0.12)]);

        let state = controller.state();
        assert_eq!(
            state.location,
            Some(Location::with_country("London", "United Kingdom"))
        );
        assert_eq!(state.weather.as_ref().unwrap().current.temperature, 14.0);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_geolocation_with_unknown_reverse_still_shows_weather() {
        let forecast = CannedForecast::default().respond(0.0, 0.0, snapshot(27.0));
        let (controller, _, _) = controller(CannedGeocoder::default(), forecast);

        let outcome = controller
            .initial_geolocation(&FixedPosition::new(0.0, 0.0))
            .await;
        assert_eq!(outcome, SearchOutcome::Updated);

        let state = controller.state();
        assert!(state.location.is_none());
        assert!(state.weather.is_some());
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_flows_newest_wins() {
        // The geolocation fetch dwells in flight while the user submits;
        // the late result must not overwrite the newer one.
        let geocoder = CannedGeocoder {
            search_results: HashMap::from([("Paris".to_string(), vec![paris()])]),
            ..Default::default()
        };
        let forecast = CannedForecast::default()
            .respond_after(51.5, -0.12, snapshot(14.0), Duration::from_millis(500))
            .respond(48.85, 2.35, snapshot(18.0));
        let geocoder = Arc::new(geocoder);
        let forecast = Arc::new(forecast);
        let controller = Arc::new(SearchController::new(
            Arc::clone(&geocoder) as Arc<dyn Geocoder>,
            Arc::clone(&forecast) as Arc<dyn ForecastFetcher>,
        ));

        let slow = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller
                    .initial_geolocation(&FixedPosition::new(51.5, -0.12))
                    .await
            })
        };
        // Let the slow flow reach its fetch before the user submits
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert!(controller.state().is_loading);

        assert_eq!(controller.submit_by_name("Paris").await, SearchOutcome::Updated);
        assert_eq!(controller.state().weather.as_ref().unwrap().current.temperature, 18.0);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);

        let state = controller.state();
        assert_eq!(state.weather.as_ref().unwrap().current.temperature, 18.0);
        assert_eq!(state.location, Some(Location::with_country("Paris", "France")));
        assert!(!state.is_loading);
    }
}
