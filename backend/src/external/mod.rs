//! External API integrations

pub mod inference;
pub mod weather;

pub use inference::{
    FeatureExtractor, RemoteFeatureExtractor, RemoteTraitClassifier, TraitClassifier,
};
pub use weather::{WeatherClient, WeatherProvider};
