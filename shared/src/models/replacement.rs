//! Seed replacement recommendations

use serde::{Deserialize, Serialize};

use crate::models::genotype::GenotypeId;
use crate::models::hybrid::{default_hybrids, HybridRecord, TraitProfile};
use crate::models::scoring::{blend, replacement_weather_score};
use crate::models::weather::WeatherResult;

/// Catalog entries scored per request, taken from the head of the catalog
pub const HYBRIDS_PER_REQUEST: usize = 5;
/// Recommendations returned per request
pub const MAX_REPLACEMENT_RECOMMENDATIONS: usize = 5;

/// A recommended replacement hybrid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRecommendation {
    pub hybrid_name: String,
    #[serde(rename = "parent_genotypes")]
    pub parent_genotype_ids: Vec<GenotypeId>,
    pub maturity_days: u32,
    pub expected_traits: TraitProfile,
    /// Trait quality of the hybrid
    pub compatibility_score: u8,
    pub weather_score: u8,
    pub total_score: u8,
}

/// Trait quality proxy: only disease resistance counts
pub fn trait_quality(profile: &TraitProfile) -> u8 {
    if profile.is_resistant() {
        70
    } else {
        50
    }
}

/// Rank replacement hybrids from the catalog, or from the built-in set when
/// the catalog is empty. Ties keep catalog order.
pub fn recommend_replacements(
    catalog: &[HybridRecord],
    weather: &WeatherResult,
) -> Vec<ReplacementRecommendation> {
    let defaults;
    let hybrids = if catalog.is_empty() {
        defaults = default_hybrids();
        defaults.as_slice()
    } else {
        catalog
    };

    let weather_score = replacement_weather_score(weather.is_success());

    let mut recommendations: Vec<ReplacementRecommendation> = hybrids
        .iter()
        .take(HYBRIDS_PER_REQUEST)
        .map(|hybrid| {
            let quality = trait_quality(&hybrid.trait_profile);
            ReplacementRecommendation {
                hybrid_name: hybrid.name.clone(),
                parent_genotype_ids: hybrid.parent_genotype_ids.clone(),
                maturity_days: hybrid.maturity_days,
                expected_traits: hybrid.trait_profile.clone(),
                compatibility_score: quality,
                weather_score,
                total_score: blend(quality, 6, weather_score),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    recommendations.truncate(MAX_REPLACEMENT_RECOMMENDATIONS);
    recommendations
}
