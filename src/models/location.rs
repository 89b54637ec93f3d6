//! Geocoded places and display labels

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geocoding match: a named place with coordinates
///
/// Produced by forward geocoding. Immutable once constructed; when a query
/// yields multiple matches the first one is treated as the best match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Place name (city, town, etc.)
    pub name: String,
    /// Country name, when the provider reports one
    pub country: Option<String>,
    /// First-level administrative area (state, region)
    pub admin1: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Place {
    /// Coordinates of this place
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Secondary display line: "admin1, country" with absent parts omitted
    #[must_use]
    pub fn region_line(&self) -> String {
        match (&self.admin1, &self.country) {
            (Some(admin1), Some(country)) => format!("{admin1}, {country}"),
            (Some(admin1), None) => admin1.clone(),
            (None, Some(country)) => country.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Display label for the location header
///
/// A projection of [`Place`] carrying only what the header renders. The
/// country may be absent when a coordinate-only flow supplied just a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location name
    pub name: String,
    /// Country name, when known
    pub country: Option<String>,
}

impl Location {
    /// Create a name-only label
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            country: None,
        }
    }

    /// Create a label with a country
    #[must_use]
    pub fn with_country<S: Into<String>, C: Into<String>>(name: S, country: C) -> Self {
        Self {
            name: name.into(),
            country: Some(country.into()),
        }
    }
}

impl From<&Place> for Location {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            country: place.country.clone(),
        }
    }
}
