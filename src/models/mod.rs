//! Data models for the Skycast client
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoded places and display labels
//! - Weather: current/hourly/daily weather snapshots

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, Location, Place};
pub use weather::{CurrentConditions, DailyForecast, HourlyForecast, WeatherSnapshot};
