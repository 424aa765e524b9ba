//! Combined analysis results

use serde::Serialize;

use crate::models::breeding::{recommend_breeding, BreedingRecommendation};
use crate::models::genotype::{resolve_predicted, GenotypeRecord, GenotypeResolution};
use crate::models::hybrid::HybridRecord;
use crate::models::phenotype::PredictedTraits;
use crate::models::replacement::{recommend_replacements, ReplacementRecommendation};
use crate::models::weather::WeatherResult;

/// Both recommendation lists for one resolved genotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub breeding_recommendations: Vec<BreedingRecommendation>,
    pub replacement_recommendations: Vec<ReplacementRecommendation>,
}

/// Run both recommenders against the same weather evidence
pub fn build_recommendations(
    genotype: &GenotypeRecord,
    weather: &WeatherResult,
    catalog: &[HybridRecord],
) -> Recommendations {
    Recommendations {
        breeding_recommendations: recommend_breeding(genotype, weather),
        replacement_recommendations: recommend_replacements(catalog, weather),
    }
}

/// Full result of analysing one plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub predicted_traits: PredictedTraits,
    pub predicted_genotype: &'static GenotypeRecord,
    /// True when the predicted labels could not be mapped and the default genotype was used
    pub genotype_fallback: bool,
    pub weather: WeatherResult,
    #[serde(flatten)]
    pub recommendations: Recommendations,
}

impl AnalysisReport {
    pub fn new(
        predicted_traits: PredictedTraits,
        resolution: &GenotypeResolution,
        weather: WeatherResult,
        catalog: &[HybridRecord],
    ) -> Self {
        let recommendations = build_recommendations(resolution.genotype, &weather, catalog);
        Self {
            predicted_traits,
            predicted_genotype: resolution.genotype,
            genotype_fallback: resolution.is_fallback(),
            weather,
            recommendations,
        }
    }
}

/// Resolve and recommend in one step, for callers that already hold the weather
pub fn analyze_traits(
    predicted_traits: PredictedTraits,
    weather: WeatherResult,
    catalog: &[HybridRecord],
) -> AnalysisReport {
    let resolution = resolve_predicted(&predicted_traits);
    AnalysisReport::new(predicted_traits, &resolution, weather, catalog)
}
