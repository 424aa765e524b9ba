//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather API by city name

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{WeatherObservation, WeatherResult};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Source of weather evidence for a location.
///
/// Implementations never fail: any problem is reported as
/// `WeatherResult::Unavailable`.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, location: &str) -> WeatherResult;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    api_endpoint: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: i32,
}

impl WeatherClient {
    /// Create a new WeatherClient with a bounded request timeout
    pub fn new(api_endpoint: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_endpoint,
        })
    }

    /// Whether an API key is configured
    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Fetch current conditions by location name, e.g. `Bangalore,IN`
    pub async fn get_current_weather(&self, location: &str) -> AppResult<WeatherObservation> {
        let response = self
            .client
            .get(&self.api_endpoint)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherService(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response
            .json()
            .await
            .map_err(|e| AppError::WeatherService(format!("Failed to parse response: {}", e)))?;

        convert_current_response(location, data)
    }
}

/// Convert an OpenWeatherMap response to an observation
fn convert_current_response(
    location: &str,
    data: OWMCurrentResponse,
) -> AppResult<WeatherObservation> {
    let description = data
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| AppError::WeatherService("Response has no weather conditions".into()))?;

    let temperature_celsius = Decimal::from_f64(data.main.temp)
        .map(|t| t.round_dp(2))
        .ok_or_else(|| {
            AppError::WeatherService(format!("Invalid temperature: {}", data.main.temp))
        })?;

    Ok(WeatherObservation {
        location: location.to_string(),
        temperature_celsius,
        humidity_percent: data.main.humidity,
        description,
    })
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn fetch(&self, location: &str) -> WeatherResult {
        if !self.is_enabled() {
            tracing::debug!("Weather API key not configured, skipping lookup");
            return WeatherResult::unavailable(location);
        }

        match self.get_current_weather(location).await {
            Ok(observation) => WeatherResult::Observed(observation),
            Err(e) => {
                tracing::warn!("Weather lookup for {} failed: {}", location, e);
                WeatherResult::unavailable(location)
            }
        }
    }
}
