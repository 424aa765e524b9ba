//! Trait prediction from leaf images
//!
//! Chains the feature extractor with one classifier per trait. Any
//! collaborator may be absent or failing; the result then simply lacks the
//! affected labels.

use shared::{PredictedTraits, TraitKind};
use std::sync::Arc;

use crate::config::InferenceConfig;
use crate::error::{AppError, AppResult};
use crate::external::{
    FeatureExtractor, RemoteFeatureExtractor, RemoteTraitClassifier, TraitClassifier,
};

/// Predicts trait labels for an uploaded image
#[derive(Clone, Default)]
pub struct TraitPredictor {
    extractor: Option<Arc<dyn FeatureExtractor>>,
    classifiers: Vec<(TraitKind, Arc<dyn TraitClassifier>)>,
}

impl TraitPredictor {
    /// Predictor with no collaborators; every prediction is empty
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn FeatureExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Register the classifier for one trait, replacing any previous one
    pub fn with_classifier(
        mut self,
        kind: TraitKind,
        classifier: Arc<dyn TraitClassifier>,
    ) -> Self {
        self.classifiers.retain(|(k, _)| *k != kind);
        self.classifiers.push((kind, classifier));
        self
    }

    /// Build remote clients for every configured endpoint
    pub fn from_config(config: &InferenceConfig) -> AppResult<Self> {
        let mut predictor = Self::new();

        if let Some(endpoint) = &config.feature_endpoint {
            let extractor = RemoteFeatureExtractor::new(
                endpoint.clone(),
                config.api_key.clone(),
                config.timeout(),
            )?;
            predictor = predictor.with_extractor(Arc::new(extractor));
        }

        let endpoints = [
            (TraitKind::Yield, &config.yield_endpoint),
            (TraitKind::DiseaseResistance, &config.disease_resistance_endpoint),
            (TraitKind::StressTolerance, &config.stress_tolerance_endpoint),
        ];
        for (kind, endpoint) in endpoints {
            if let Some(endpoint) = endpoint {
                let classifier = RemoteTraitClassifier::new(
                    endpoint.clone(),
                    config.api_key.clone(),
                    config.timeout(),
                )?;
                predictor = predictor.with_classifier(kind, Arc::new(classifier));
            }
        }

        Ok(predictor)
    }

    /// Number of trait classifiers available
    pub fn models_loaded(&self) -> usize {
        self.classifiers.len()
    }

    fn classifier(&self, kind: TraitKind) -> Option<&Arc<dyn TraitClassifier>> {
        self.classifiers
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| c)
    }

    /// Predict labels for an image.
    ///
    /// Only an undecodable image is an error. Unavailable collaborators leave
    /// the affected traits unset.
    pub async fn predict(&self, image: &[u8]) -> AppResult<PredictedTraits> {
        let mut traits = PredictedTraits::default();

        let Some(extractor) = &self.extractor else {
            tracing::warn!("No feature extractor configured, traits left unpredicted");
            return Ok(traits);
        };

        let features = match extractor.extract(image).await {
            Ok(features) => features,
            Err(e @ AppError::ImageDecode(_)) => return Err(e),
            Err(e) => {
                tracing::warn!("Feature extraction failed: {}", e);
                return Ok(traits);
            }
        };
        tracing::debug!("Extracted {} features", features.len());

        for kind in TraitKind::ALL {
            let Some(classifier) = self.classifier(kind) else {
                tracing::warn!("No classifier loaded for {}", kind);
                continue;
            };

            match classifier.predict(&features).await {
                Ok(label) => {
                    tracing::debug!("Predicted {} = {}", kind, label);
                    traits.set(kind, label);
                }
                Err(e) => tracing::warn!("Error predicting {}: {}", kind, e),
            }
        }

        Ok(traits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedExtractor;

    #[async_trait]
    impl FeatureExtractor for FixedExtractor {
        async fn extract(&self, image: &[u8]) -> AppResult<Vec<f32>> {
            if image.is_empty() {
                return Err(AppError::ImageDecode("empty image".into()));
            }
            Ok(vec![0.5; 8])
        }
    }

    struct DownExtractor;

    #[async_trait]
    impl FeatureExtractor for DownExtractor {
        async fn extract(&self, _image: &[u8]) -> AppResult<Vec<f32>> {
            Err(AppError::InferenceService("connection refused".into()))
        }
    }

    struct FixedClassifier(&'static str);

    #[async_trait]
    impl TraitClassifier for FixedClassifier {
        async fn predict(&self, _features: &[f32]) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl TraitClassifier for FailingClassifier {
        async fn predict(&self, _features: &[f32]) -> AppResult<String> {
            Err(AppError::InferenceService("timeout".into()))
        }
    }

    fn full_predictor() -> TraitPredictor {
        TraitPredictor::new()
            .with_extractor(Arc::new(FixedExtractor))
            .with_classifier(TraitKind::Yield, Arc::new(FixedClassifier("High")))
            .with_classifier(
                TraitKind::DiseaseResistance,
                Arc::new(FixedClassifier("Resistant")),
            )
            .with_classifier(TraitKind::StressTolerance, Arc::new(FixedClassifier("Low")))
    }

    #[tokio::test]
    async fn test_all_classifiers_contribute() {
        let traits = full_predictor().predict(b"leaf").await.unwrap();
        assert_eq!(traits.get(TraitKind::Yield), Some("High"));
        assert_eq!(traits.get(TraitKind::DiseaseResistance), Some("Resistant"));
        assert_eq!(traits.get(TraitKind::StressTolerance), Some("Low"));
    }

    #[tokio::test]
    async fn test_failing_classifier_is_skipped() {
        let predictor = full_predictor()
            .with_classifier(TraitKind::StressTolerance, Arc::new(FailingClassifier));
        assert_eq!(predictor.models_loaded(), 3);

        let traits = predictor.predict(b"leaf").await.unwrap();
        assert_eq!(traits.get(TraitKind::Yield), Some("High"));
        assert_eq!(traits.get(TraitKind::StressTolerance), None);
    }

    #[tokio::test]
    async fn test_no_collaborators_yields_empty() {
        let traits = TraitPredictor::new().predict(b"leaf").await.unwrap();
        assert!(traits.is_empty());

        let predictor = TraitPredictor::new()
            .with_extractor(Arc::new(DownExtractor))
            .with_classifier(TraitKind::Yield, Arc::new(FixedClassifier("High")));
        assert!(predictor.predict(b"leaf").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_image_is_an_error() {
        let result = full_predictor().predict(b"").await;
        assert!(matches!(result, Err(AppError::ImageDecode(_))));
    }

    #[test]
    fn test_from_config_without_endpoints() {
        let predictor = TraitPredictor::from_config(&InferenceConfig::default()).unwrap();
        assert_eq!(predictor.models_loaded(), 0);
        assert!(predictor.extractor.is_none());
    }
}
