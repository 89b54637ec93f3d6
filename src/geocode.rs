//! Geocoding client for the Open-Meteo geocoding API
//!
//! Provides forward geocoding (name to coordinates) and reverse geocoding
//! (coordinates to name). Lookups are not cached; repeated identical queries
//! re-fetch from the provider.

use crate::config::SkycastConfig;
use crate::models::{Location, Place};
use crate::{Result, SkycastError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Minimum number of trimmed characters before a name lookup is attempted
pub const MIN_QUERY_LEN: usize = 2;

/// Outcome of resolving a free-text city name
#[derive(Debug, Clone, PartialEq)]
pub enum NameResolution {
    /// Input was too short to query; silently ignored
    Skipped,
    /// The provider returned zero results
    NotFound,
    /// Best match (first provider result)
    Found(Place),
}

/// Geocoding provider seam
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward search: list of matching places, best match first
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Place>>;

    /// Reverse lookup: display labels for a coordinate pair, best match first
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Vec<Location>>;
}

/// Name and coordinate resolution on top of a [`Geocoder`]
pub struct GeoResolver;

impl GeoResolver {
    /// Resolve a free-text city name to its best-matching place
    ///
    /// Inputs shorter than [`MIN_QUERY_LEN`] trimmed characters issue no
    /// network call. Zero provider results resolve to
    /// [`NameResolution::NotFound`] rather than an error.
    pub async fn resolve_name(geocoder: &dyn Geocoder, city: &str) -> Result<NameResolution> {
        let trimmed = city.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            debug!("Skipping name resolution for short input: {:?}", city);
            return Ok(NameResolution::Skipped);
        }

        let mut places = geocoder.search(trimmed, 1).await?;
        if places.is_empty() {
            info!("No geocoding results for '{}'", trimmed);
            return Ok(NameResolution::NotFound);
        }

        let place = places.remove(0);
        debug!(
            "Resolved '{}' to {} ({:.4}, {:.4})",
            trimmed, place.name, place.latitude, place.longitude
        );
        Ok(NameResolution::Found(place))
    }

    /// Resolve coordinates to a display label via reverse geocoding
    ///
    /// Returns `None` when the provider has no results or the lookup fails;
    /// the caller keeps rendering weather either way.
    pub async fn resolve_coordinates(
        geocoder: &dyn Geocoder,
        latitude: f64,
        longitude: f64,
    ) -> Option<Location> {
        match geocoder.reverse(latitude, longitude).await {
            Ok(mut labels) if !labels.is_empty() => Some(labels.remove(0)),
            Ok(_) => {
                debug!(
                    "No reverse geocoding results for ({:.4}, {:.4})",
                    latitude, longitude
                );
                None
            }
            Err(e) => {
                warn!(
                    "Reverse geocoding failed for ({:.4}, {:.4}): {}",
                    latitude, longitude, e
                );
                None
            }
        }
    }
}

/// Open-Meteo geocoding API client
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl OpenMeteoGeocoder {
    /// Create a new geocoding client
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkycastError::geocode(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.network.geocoding_base_url.clone(),
            language: config.search.language.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Place>> {
        let url = format!(
            "{}/search?name={}&count={}&language={}&format=json",
            self.base_url,
            urlencoding::encode(query),
            count,
            self.language
        );
        debug!("Geocoding search request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkycastError::geocode(format!("Search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SkycastError::geocode(format!(
                "Search request returned HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SkycastError::geocode(format!("Invalid search response: {e}")))?;

        let places: Vec<Place> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Place::from)
            .collect();

        debug!("Geocoding search for '{}' returned {} results", query, places.len());
        Ok(places)
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Vec<Location>> {
        let url = format!(
            "{}/reverse?latitude={}&longitude={}",
            self.base_url, latitude, longitude
        );
        debug!("Reverse geocoding request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkycastError::geocode(format!("Reverse request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SkycastError::geocode(format!(
                "Reverse request returned HTTP {}",
                response.status()
            )));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| SkycastError::geocode(format!("Invalid reverse response: {e}")))?;

        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|record| Location {
                name: record.name,
                country: record.country,
            })
            .collect())
    }
}

/// Forward geocoding response wire format
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<PlaceRecord>>,
}

#[derive(Debug, Deserialize)]
struct PlaceRecord {
    name: String,
    country: Option<String>,
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<PlaceRecord> for Place {
    fn from(record: PlaceRecord) -> Self {
        Self {
            name: record.name,
            country: record.country,
            admin1: record.admin1,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// Reverse geocoding response wire format
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    results: Option<Vec<ReverseRecord>>,
}

#[derive(Debug, Deserialize)]
struct ReverseRecord {
    name: String,
    country: Option<String>,
}
