//! Weather snapshot model
//!
//! A snapshot is a complete current/hourly/daily bundle that replaces any
//! prior one wholesale after a successful fetch. Hourly and daily data are
//! parallel arrays indexed by hour/day offset, as delivered by the provider.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f32,
    /// Relative humidity in percent (0-100)
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: f32,
    /// WMO weather code
    pub weather_code: u8,
}

/// Hourly forecast as parallel arrays indexed by hour offset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// ISO-8601 timestamps, one per hour
    pub time: Vec<String>,
    /// Temperature in Celsius
    pub temperature: Vec<f32>,
    /// Relative humidity in percent
    pub humidity: Vec<u8>,
    /// Wind speed in km/h
    pub wind_speed: Vec<f32>,
    /// WMO weather codes
    pub weather_code: Vec<u8>,
    /// Visibility in meters
    pub visibility: Vec<f32>,
}

impl HourlyForecast {
    /// Number of hourly entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the forecast holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Whether all parallel arrays share the same length
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.time.len();
        self.temperature.len() == len
            && self.humidity.len() == len
            && self.wind_speed.len() == len
            && self.weather_code.len() == len
            && self.visibility.len() == len
    }

    /// Index of the entry whose hour-of-day matches `hour`, searched within
    /// the first 24 entries (today's strip)
    #[must_use]
    pub fn current_hour_index(&self, hour: u32) -> Option<usize> {
        self.time
            .iter()
            .take(24)
            .position(|time| hour_of(time) == Some(hour))
    }
}

/// Daily forecast as parallel arrays indexed by day offset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Date-only entries, one per day
    pub time: Vec<String>,
    /// WMO weather codes; empty when the provider omits them
    pub weather_code: Vec<u8>,
    /// Daily maximum temperature in Celsius
    pub temperature_max: Vec<f32>,
    /// Daily minimum temperature in Celsius
    pub temperature_min: Vec<f32>,
    /// Daily maximum wind speed in km/h
    pub wind_speed_max: Vec<f32>,
    /// Daily minimum wind speed in km/h
    pub wind_speed_min: Vec<f32>,
}

impl DailyForecast {
    /// Number of daily entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the forecast holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Whether all parallel arrays share the same length
    ///
    /// An empty `weather_code` array is allowed; the provider may omit it.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.time.len();
        (self.weather_code.is_empty() || self.weather_code.len() == len)
            && self.temperature_max.len() == len
            && self.temperature_min.len() == len
            && self.wind_speed_max.len() == len
            && self.wind_speed_min.len() == len
    }
}

/// A complete weather data bundle, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Current conditions
    pub current: CurrentConditions,
    /// Hourly forecast arrays
    pub hourly: HourlyForecast,
    /// Daily forecast arrays
    pub daily: DailyForecast,
}

impl WeatherSnapshot {
    /// Whether both the hourly and daily bundles are index-aligned
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.hourly.is_aligned() && self.daily.is_aligned()
    }
}

/// Extract the hour-of-day from an ISO-8601 timestamp like `2024-05-01T14:00`
#[must_use]
pub fn hour_of(time: &str) -> Option<u32> {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|dt| dt.hour())
}
