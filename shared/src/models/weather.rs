//! Weather evidence models

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Current conditions reported for a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherObservation {
    pub location: String,
    pub temperature_celsius: Decimal,
    pub humidity_percent: i32,
    pub description: String,
}

/// Result of a weather lookup.
///
/// A failed lookup is a normal value, not an error: recommendation scoring
/// treats it as a low-signal reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherResult {
    Observed(WeatherObservation),
    Unavailable { location: String },
}

impl WeatherResult {
    pub fn unavailable(location: impl Into<String>) -> Self {
        WeatherResult::Unavailable {
            location: location.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WeatherResult::Observed(_))
    }

    pub fn location(&self) -> &str {
        match self {
            WeatherResult::Observed(observation) => &observation.location,
            WeatherResult::Unavailable { location } => location,
        }
    }
}

/// Flat wire shape: `{success, location, temperature?, humidity?, description?}`
#[derive(Serialize, Deserialize)]
struct WeatherResultBody {
    success: bool,
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    humidity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Serialize for WeatherResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            WeatherResult::Observed(observation) => WeatherResultBody {
                success: true,
                location: observation.location.clone(),
                temperature: Some(observation.temperature_celsius),
                humidity: Some(observation.humidity_percent),
                description: Some(observation.description.clone()),
            },
            WeatherResult::Unavailable { location } => WeatherResultBody {
                success: false,
                location: location.clone(),
                temperature: None,
                humidity: None,
                description: None,
            },
        };
        body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeatherResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = WeatherResultBody::deserialize(deserializer)?;

        match (body.success, body.temperature, body.humidity, body.description) {
            (true, Some(temperature_celsius), Some(humidity_percent), Some(description)) => {
                Ok(WeatherResult::Observed(WeatherObservation {
                    location: body.location,
                    temperature_celsius,
                    humidity_percent,
                    description,
                }))
            }
            // A "successful" body without readings carries no usable evidence
            _ => Ok(WeatherResult::unavailable(body.location)),
        }
    }
}
