//! Configuration management for the AgriGen analysis server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRIGEN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Feature extraction and trait classifier endpoints
    pub inference: InferenceConfig,

    /// Hybrid catalog configuration
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Current-weather endpoint (OpenWeatherMap compatible)
    pub api_endpoint: String,

    /// Weather API key; empty disables live weather
    pub api_key: String,

    /// Upper bound on a weather lookup
    pub timeout_secs: u64,

    /// Location used when a request names none
    pub default_location: String,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    /// Feature extractor endpoint
    pub feature_endpoint: Option<String>,

    /// Yield classifier endpoint
    pub yield_endpoint: Option<String>,

    /// Disease resistance classifier endpoint
    pub disease_resistance_endpoint: Option<String>,

    /// Stress tolerance classifier endpoint
    pub stress_tolerance_endpoint: Option<String>,

    /// API key sent to the inference services
    pub api_key: Option<String>,

    /// Request timeout for inference calls
    pub timeout_secs: u64,
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Path to the hybrid catalog JSON file
    pub path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRIGEN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.max_upload_bytes", shared::MAX_UPLOAD_BYTES as i64)?
            .set_default(
                "weather.api_endpoint",
                "https://api.openweathermap.org/data/2.5/weather",
            )?
            .set_default("weather.api_key", "")?
            .set_default("weather.timeout_secs", 5)?
            .set_default("weather.default_location", "Bangalore,IN")?
            .set_default("inference.timeout_secs", 30)?
            .set_default("catalog.path", "data/hybrid_database.json")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRIGEN_ prefix)
            .add_source(
                Environment::with_prefix("AGRIGEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            max_upload_bytes: shared::MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            timeout_secs: 5,
            default_location: "Bangalore,IN".to_string(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            feature_endpoint: None,
            yield_endpoint: None,
            disease_resistance_endpoint: None,
            stress_tolerance_endpoint: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            inference: InferenceConfig::default(),
            catalog: CatalogConfig {
                path: "data/hybrid_database.json".to_string(),
            },
        }
    }
}
