//! Forecast client for the Open-Meteo forecast API
//!
//! One request retrieves the full current/hourly/daily bundle with a fixed
//! field selection. Timezone resolution is delegated to the provider via
//! `timezone=auto`; no timezone math happens client-side.

use crate::config::SkycastConfig;
use crate::models::{CurrentConditions, DailyForecast, HourlyForecast, WeatherSnapshot};
use crate::{Result, SkycastError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// Current-conditions fields requested from the provider
const CURRENT_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m,relative_humidity_2m";
/// Hourly fields requested from the provider
const HOURLY_FIELDS: &str =
    "temperature_2m,weather_code,relative_humidity_2m,wind_speed_10m,visibility";
/// Daily fields requested from the provider
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,wind_speed_10m_max,wind_speed_10m_min";

/// Forecast provider seam
#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    /// Fetch the full weather bundle for a coordinate pair
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot>;
}

/// Open-Meteo forecast API client
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoForecast {
    /// Create a new forecast client
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkycastError::fetch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.network.forecast_base_url.clone(),
        })
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoForecast {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&hourly={}&daily={}&timezone=auto",
            self.base_url, latitude, longitude, CURRENT_FIELDS, HOURLY_FIELDS, DAILY_FIELDS
        );
        debug!("Forecast request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkycastError::fetch(format!("Forecast request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SkycastError::fetch(format!(
                "Forecast request returned HTTP {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| SkycastError::fetch(format!("Invalid forecast response: {e}")))?;

        let snapshot = WeatherSnapshot::from(body);
        info!(
            "Retrieved forecast for ({:.4}, {:.4}): {} hourly / {} daily entries",
            latitude,
            longitude,
            snapshot.hourly.len(),
            snapshot.daily.len()
        );
        Ok(snapshot)
    }
}

/// Forecast response wire format
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentData,
    hourly: HourlyData,
    daily: DailyData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: f32,
    #[serde(rename = "relative_humidity_2m")]
    humidity: u8,
    #[serde(rename = "wind_speed_10m")]
    wind_speed: f32,
    weather_code: u8,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    temperature: Vec<f32>,
    #[serde(rename = "relative_humidity_2m")]
    humidity: Vec<u8>,
    #[serde(rename = "wind_speed_10m")]
    wind_speed: Vec<f32>,
    weather_code: Vec<u8>,
    visibility: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<u8>,
    #[serde(rename = "temperature_2m_max")]
    temperature_max: Vec<f32>,
    #[serde(rename = "temperature_2m_min")]
    temperature_min: Vec<f32>,
    #[serde(rename = "wind_speed_10m_max")]
    wind_speed_max: Vec<f32>,
    #[serde(rename = "wind_speed_10m_min")]
    wind_speed_min: Vec<f32>,
}

impl From<ForecastResponse> for WeatherSnapshot {
    fn from(response: ForecastResponse) -> Self {
        Self {
            current: CurrentConditions {
                temperature: response.current.temperature,
                humidity: response.current.humidity,
                wind_speed: response.current.wind_speed,
                weather_code: response.current.weather_code,
            },
            hourly: HourlyForecast {
                time: response.hourly.time,
                temperature: response.hourly.temperature,
                humidity: response.hourly.humidity,
                wind_speed: response.hourly.wind_speed,
                weather_code: response.hourly.weather_code,
                visibility: response.hourly.visibility,
            },
            daily: DailyForecast {
                time: response.daily.time,
                weather_code: response.daily.weather_code,
                temperature_max: response.daily.temperature_max,
                temperature_min: response.daily.temperature_min,
                wind_speed_max: response.daily.wind_speed_max,
                wind_speed_min: response.daily.wind_speed_min,
            },
        }
    }
}
