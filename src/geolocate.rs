//! Device geolocation capability
//!
//! The runtime may or may not expose a position source. The controller
//! consumes one exactly once at startup; denial or failure is a silent no-op.

use crate::models::Coordinates;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from a geolocation source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocateError {
    /// The runtime exposes no geolocation capability
    #[error("geolocation is not available")]
    Unavailable,
    /// The user denied the position request
    #[error("geolocation permission denied")]
    Denied,
    /// The position request failed
    #[error("geolocation failed: {0}")]
    Failed(String),
}

/// A source of the device's current position
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    /// Whether the runtime exposes this capability at all
    fn is_available(&self) -> bool {
        true
    }

    /// Current device position
    async fn current_position(&self) -> Result<Coordinates, GeolocateError>;
}

/// The default source on platforms without a position service
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl GeolocationSource for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, GeolocateError> {
        Err(GeolocateError::Unavailable)
    }
}

/// A source pinned to fixed coordinates, for demos and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl FixedPosition {
    /// Create a source that always reports the given coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Coordinates::new(latitude, longitude))
    }
}

#[async_trait]
impl GeolocationSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocateError> {
        Ok(self.0)
    }
}
