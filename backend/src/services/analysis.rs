//! Analysis orchestration
//!
//! Runs one plant analysis through its stages in order:
//! `ReceiveInput -> ResolveGenotype -> FetchWeather -> BuildRecommendations -> Respond`.
//! Weather problems never fail an analysis; they degrade the scores instead.

use serde::Serialize;
use shared::{resolve_predicted, AnalysisReport, PredictedTraits, WeatherResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::WeatherProvider;
use crate::services::catalog::HybridCatalog;
use crate::services::prediction::TraitPredictor;

/// Stage of a single analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    ReceiveInput,
    ResolveGenotype,
    FetchWeather,
    BuildRecommendations,
    Respond,
    Completed,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::ReceiveInput => "receive_input",
            AnalysisStage::ResolveGenotype => "resolve_genotype",
            AnalysisStage::FetchWeather => "fetch_weather",
            AnalysisStage::BuildRecommendations => "build_recommendations",
            AnalysisStage::Respond => "respond",
            AnalysisStage::Completed => "completed",
            AnalysisStage::Failed => "failed",
        }
    }

    /// Check if transition to the target stage is valid
    pub fn can_transition_to(&self, target: AnalysisStage) -> bool {
        use AnalysisStage::*;
        matches!(
            (self, target),
            (ReceiveInput, ResolveGenotype)
                | (ResolveGenotype, FetchWeather)
                | (FetchWeather, BuildRecommendations)
                | (BuildRecommendations, Respond)
                | (Respond, Completed)
                // Input is only rejected before the core runs
                | (ReceiveInput, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStage::Completed | AnalysisStage::Failed)
    }
}

/// Tracks the stage of one analysis and records it on the current span
#[derive(Debug)]
struct StageTracker {
    stage: AnalysisStage,
}

impl StageTracker {
    fn new() -> Self {
        let tracker = Self {
            stage: AnalysisStage::ReceiveInput,
        };
        tracker.record();
        tracker
    }

    fn advance(&mut self, target: AnalysisStage) -> AppResult<()> {
        if !self.stage.can_transition_to(target) {
            return Err(AppError::Internal(format!(
                "Invalid analysis stage transition: {} -> {}",
                self.stage.as_str(),
                target.as_str()
            )));
        }
        self.stage = target;
        self.record();
        Ok(())
    }

    fn record(&self) {
        tracing::Span::current().record("stage", self.stage.as_str());
        if self.stage.is_terminal() {
            tracing::debug!("Analysis finished: {}", self.stage.as_str());
        } else {
            tracing::debug!("Analysis stage: {}", self.stage.as_str());
        }
    }
}

/// Result of a completed analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Orchestrates trait prediction, genotype resolution, weather and ranking
#[derive(Clone)]
pub struct AnalysisService {
    predictor: Arc<TraitPredictor>,
    weather: Arc<dyn WeatherProvider>,
    catalog: Arc<HybridCatalog>,
    weather_timeout: Duration,
}

impl AnalysisService {
    pub fn new(
        predictor: Arc<TraitPredictor>,
        weather: Arc<dyn WeatherProvider>,
        catalog: Arc<HybridCatalog>,
        weather_timeout: Duration,
    ) -> Self {
        Self {
            predictor,
            weather,
            catalog,
            weather_timeout,
        }
    }

    /// Predict trait labels only, substituting the defaults when nothing
    /// could be predicted
    pub async fn predict_traits(&self, image: &[u8]) -> AppResult<PredictedTraits> {
        let traits = self.predictor.predict(image).await?;
        let (traits, substituted) = traits.or_default_labels();
        if substituted {
            tracing::warn!("No trait predictions available, using default traits");
        }
        Ok(traits)
    }

    /// Full analysis of an uploaded leaf image
    pub async fn analyze_image(&self, image: &[u8], location: &str) -> AppResult<AnalysisOutcome> {
        let analysis_id = Uuid::new_v4();
        let span = analysis_span(analysis_id, location);

        async move {
            let mut tracker = StageTracker::new();

            let traits = match self.predict_traits(image).await {
                Ok(traits) => traits,
                Err(e) => {
                    tracker.advance(AnalysisStage::Failed)?;
                    return Err(e);
                }
            };

            self.run(&mut tracker, analysis_id, traits, location).await
        }
        .instrument(span)
        .await
    }

    /// Analysis from already known trait labels
    pub async fn recommend(
        &self,
        traits: PredictedTraits,
        location: &str,
    ) -> AppResult<AnalysisOutcome> {
        let analysis_id = Uuid::new_v4();
        let span = analysis_span(analysis_id, location);

        async move {
            let mut tracker = StageTracker::new();
            let (traits, substituted) = traits.or_default_labels();
            if substituted {
                tracing::warn!("Request carried no traits, using default traits");
            }
            self.run(&mut tracker, analysis_id, traits, location).await
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        tracker: &mut StageTracker,
        analysis_id: Uuid,
        traits: PredictedTraits,
        location: &str,
    ) -> AppResult<AnalysisOutcome> {
        tracker.advance(AnalysisStage::ResolveGenotype)?;
        let resolution = resolve_predicted(&traits);
        if let Some(reason) = &resolution.fallback {
            tracing::warn!("Trait labels could not be mapped ({}), using default genotype", reason);
        }
        tracing::info!(
            "Predicted genotype {}: {}",
            resolution.genotype.genotype_id,
            resolution.genotype.description
        );

        tracker.advance(AnalysisStage::FetchWeather)?;
        let weather = self.fetch_weather(location).await;

        tracker.advance(AnalysisStage::BuildRecommendations)?;
        let report = AnalysisReport::new(traits, &resolution, weather, self.catalog.hybrids());
        tracing::debug!(
            "Generated {} breeding and {} replacement recommendations",
            report.recommendations.breeding_recommendations.len(),
            report.recommendations.replacement_recommendations.len()
        );

        tracker.advance(AnalysisStage::Respond)?;
        let outcome = AnalysisOutcome {
            analysis_id,
            report,
        };

        tracker.advance(AnalysisStage::Completed)?;
        Ok(outcome)
    }

    async fn fetch_weather(&self, location: &str) -> WeatherResult {
        match tokio::time::timeout(self.weather_timeout, self.weather.fetch(location)).await {
            Ok(weather) => {
                if !weather.is_success() {
                    tracing::warn!("Weather unavailable for {}, using fallback scores", location);
                }
                weather
            }
            Err(_) => {
                tracing::warn!(
                    "Weather lookup for {} timed out after {:?}",
                    location,
                    self.weather_timeout
                );
                WeatherResult::unavailable(location)
            }
        }
    }
}

fn analysis_span(analysis_id: Uuid, location: &str) -> tracing::Span {
    tracing::info_span!(
        "analysis",
        %analysis_id,
        location,
        stage = tracing::field::Empty
    )
}
