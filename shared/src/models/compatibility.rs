//! Breeding compatibility tiers and scoring

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::models::genotype::GenotypeId;

/// Quality tier used to score breeding compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    Superior,
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl CompatibilityTier {
    pub const ALL: [CompatibilityTier; 6] = [
        CompatibilityTier::Superior,
        CompatibilityTier::Excellent,
        CompatibilityTier::Good,
        CompatibilityTier::Average,
        CompatibilityTier::BelowAverage,
        CompatibilityTier::Poor,
    ];

    /// Tier membership of a genotype
    pub fn of(id: GenotypeId) -> Self {
        // verify_tier_partition rejects a table that leaves a genotype out
        tier_in(&COMPATIBILITY_TIERS, id).unwrap_or(CompatibilityTier::Poor)
    }

    /// Genotypes in this tier, in ID order
    pub fn members(self) -> Vec<GenotypeId> {
        COMPATIBILITY_TIERS
            .iter()
            .find(|(tier, _)| *tier == self)
            .map(|(_, numbers)| {
                numbers
                    .iter()
                    .filter_map(|number| GenotypeId::new(*number).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Tier membership by genotype number
pub type TierTable = [(CompatibilityTier, &'static [u8]); 6];

pub static COMPATIBILITY_TIERS: TierTable = [
    (CompatibilityTier::Superior, &[1, 2, 3]),
    (CompatibilityTier::Excellent, &[4, 5, 10, 11]),
    (CompatibilityTier::Good, &[6, 12, 13, 19, 20]),
    (CompatibilityTier::Average, &[14, 15, 21, 22]),
    (CompatibilityTier::BelowAverage, &[7, 8, 16, 17, 23]),
    (CompatibilityTier::Poor, &[9, 18, 24, 25, 26, 27]),
];

fn tier_in(table: &[(CompatibilityTier, &[u8])], id: GenotypeId) -> Option<CompatibilityTier> {
    table
        .iter()
        .find(|(_, numbers)| numbers.contains(&id.number()))
        .map(|(tier, _)| *tier)
}

impl fmt::Display for CompatibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityTier::Superior => write!(f, "Superior"),
            CompatibilityTier::Excellent => write!(f, "Excellent"),
            CompatibilityTier::Good => write!(f, "Good"),
            CompatibilityTier::Average => write!(f, "Average"),
            CompatibilityTier::BelowAverage => write!(f, "Below Average"),
            CompatibilityTier::Poor => write!(f, "Poor"),
        }
    }
}

/// Lowest score the distance fallback can produce
pub const MIN_DISTANCE_SCORE: u8 = 20;

/// Breeding compatibility (0-100) of `user` with `partner`.
///
/// Only the user's tier selects the scoring rule, so the score is not
/// symmetric. Genotypes outside the superior and excellent tiers are scored
/// by ID distance.
pub fn compatibility_score(user: GenotypeId, partner: GenotypeId) -> u8 {
    use CompatibilityTier::*;

    match (CompatibilityTier::of(user), CompatibilityTier::of(partner)) {
        (Superior, Superior) => 95,
        (Superior, Excellent) => 90,
        (Superior, Good) => 75,
        (Superior, _) => 50,
        (Excellent, Superior) => 90,
        (Excellent, Excellent) => 88,
        (Excellent, Good) => 70,
        (Excellent, _) => 45,
        _ => distance_score(user, partner),
    }
}

fn distance_score(user: GenotypeId, partner: GenotypeId) -> u8 {
    let distance = user.number().abs_diff(partner.number());
    100u8
        .saturating_sub(distance.saturating_mul(3))
        .max(MIN_DISTANCE_SCORE)
}

/// Score two genotype IDs given as strings, e.g. `"G14"` and `"G20"`
pub fn compatibility_score_for(user: &str, partner: &str) -> CoreResult<u8> {
    let user: GenotypeId = user.parse()?;
    let partner: GenotypeId = partner.parse()?;
    Ok(compatibility_score(user, partner))
}

/// Check the six tiers partition all 27 genotypes
pub fn verify_tier_partition() -> CoreResult<()> {
    verify_tier_table(&COMPATIBILITY_TIERS)
}

/// Check every genotype G1..G27 is listed in exactly one tier of `table`
pub fn verify_tier_table(table: &[(CompatibilityTier, &[u8])]) -> CoreResult<()> {
    let mut listed = [0usize; GenotypeId::COUNT as usize];

    for (tier, numbers) in table {
        for number in numbers.iter() {
            let id = GenotypeId::new(*number).map_err(|_| {
                CoreError::InconsistentTables(format!(
                    "{} tier lists unknown genotype G{}",
                    tier, number
                ))
            })?;
            listed[usize::from(id.number() - 1)] += 1;
        }
    }

    for id in GenotypeId::all() {
        match listed[usize::from(id.number() - 1)] {
            1 => {}
            0 => {
                return Err(CoreError::InconsistentTables(format!(
                    "{} is in no compatibility tier",
                    id
                )))
            }
            count => {
                return Err(CoreError::InconsistentTables(format!(
                    "{} is in {} compatibility tiers",
                    id, count
                )))
            }
        }
    }

    Ok(())
}
