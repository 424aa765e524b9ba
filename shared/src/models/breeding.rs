//! Breeding partner recommendations

use serde::{Deserialize, Serialize};

use crate::models::compatibility::compatibility_score;
use crate::models::genotype::{GenotypeId, GenotypeRecord};
use crate::models::scoring::{blend, breeding_weather_suitability};
use crate::models::weather::WeatherResult;

/// Candidates scored per request, taken from the head of the pool
pub const CANDIDATES_PER_POOL: usize = 5;
/// Recommendations returned per request
pub const MAX_BREEDING_RECOMMENDATIONS: usize = 3;
/// Same for every partner
pub const BREEDING_EXPECTED_TRAITS: &str = "High yield, disease resistant, stress tolerant";

/// Candidate partner pool, chosen from the user's genotype.
///
/// Membership here is its own list and does not follow the compatibility tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedingPool {
    /// Weak genotypes, paired with the strongest partners
    Poor,
    BelowAverage,
    Standard,
}

const POOR_POOL_MEMBERS: [u8; 5] = [18, 24, 25, 26, 27];
const BELOW_AVERAGE_POOL_MEMBERS: [u8; 6] = [8, 9, 15, 16, 17, 23];

static POOR_CANDIDATES: [GenotypeId; 8] = [
    GenotypeId::of(1),
    GenotypeId::of(2),
    GenotypeId::of(3),
    GenotypeId::of(4),
    GenotypeId::of(5),
    GenotypeId::of(10),
    GenotypeId::of(11),
    GenotypeId::of(12),
];

static BELOW_AVERAGE_CANDIDATES: [GenotypeId; 10] = [
    GenotypeId::of(1),
    GenotypeId::of(2),
    GenotypeId::of(3),
    GenotypeId::of(4),
    GenotypeId::of(5),
    GenotypeId::of(6),
    GenotypeId::of(10),
    GenotypeId::of(11),
    GenotypeId::of(12),
    GenotypeId::of(13),
];

static STANDARD_CANDIDATES: [GenotypeId; 9] = [
    GenotypeId::of(1),
    GenotypeId::of(2),
    GenotypeId::of(3),
    GenotypeId::of(4),
    GenotypeId::of(5),
    GenotypeId::of(6),
    GenotypeId::of(10),
    GenotypeId::of(11),
    GenotypeId::of(12),
];

impl BreedingPool {
    pub fn for_genotype(id: GenotypeId) -> Self {
        if POOR_POOL_MEMBERS.contains(&id.number()) {
            BreedingPool::Poor
        } else if BELOW_AVERAGE_POOL_MEMBERS.contains(&id.number()) {
            BreedingPool::BelowAverage
        } else {
            BreedingPool::Standard
        }
    }

    /// Candidate partners in priority order
    pub fn candidates(self) -> &'static [GenotypeId] {
        match self {
            BreedingPool::Poor => &POOR_CANDIDATES,
            BreedingPool::BelowAverage => &BELOW_AVERAGE_CANDIDATES,
            BreedingPool::Standard => &STANDARD_CANDIDATES,
        }
    }
}

/// A recommended breeding partner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingRecommendation {
    #[serde(rename = "partner_genotype")]
    pub partner_genotype_id: GenotypeId,
    pub compatibility_score: u8,
    pub weather_suitability: u8,
    pub total_score: u8,
    pub expected_traits: String,
}

/// Rank breeding partners for a resolved genotype.
///
/// The first five pool entries are scored, the genotype itself is skipped,
/// and the best three are returned. Ties keep pool order.
pub fn recommend_breeding(
    genotype: &GenotypeRecord,
    weather: &WeatherResult,
) -> Vec<BreedingRecommendation> {
    let user_id = genotype.genotype_id;
    let weather_suitability = breeding_weather_suitability(weather.is_success());

    let mut recommendations: Vec<BreedingRecommendation> = BreedingPool::for_genotype(user_id)
        .candidates()
        .iter()
        .take(CANDIDATES_PER_POOL)
        .filter(|partner| **partner != user_id)
        .map(|&partner| {
            let compatibility = compatibility_score(user_id, partner);
            BreedingRecommendation {
                partner_genotype_id: partner,
                compatibility_score: compatibility,
                weather_suitability,
                total_score: blend(compatibility, 7, weather_suitability),
                expected_traits: BREEDING_EXPECTED_TRAITS.to_string(),
            }
        })
        .collect();

    // sort_by is stable
    recommendations.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    recommendations.truncate(MAX_BREEDING_RECOMMENDATIONS);
    recommendations
}
