//! Skycast - Open-Meteo weather lookup client
//!
//! This library provides the search-and-fetch orchestration for a weather
//! client: debounced city autocomplete, forward/reverse geocoding, forecast
//! retrieval, and the state that ties the search input to the weather
//! display.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod geolocate;
pub mod models;
pub mod suggest;
pub mod view;

// Re-export core types for public API
pub use config::SkycastConfig;
pub use controller::{AppState, SearchController, SearchOutcome};
pub use error::SkycastError;
pub use forecast::{ForecastFetcher, OpenMeteoForecast};
pub use geocode::{GeoResolver, Geocoder, NameResolution, OpenMeteoGeocoder};
pub use geolocate::{FixedPosition, GeolocateError, GeolocationSource, Unavailable};
pub use models::{Coordinates, Location, Place, WeatherSnapshot};
pub use suggest::{SearchSession, SuggestionEngine, SuggestionPhase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
