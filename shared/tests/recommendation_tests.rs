//! Recommendation ranking tests
//!
//! Tests for the breeding and replacement recommenders including:
//! - Property 4: Breeding never pairs a genotype with itself
//! - Property 5: Output is sorted and stable on ties
//! - Property 6: An empty catalog yields the built-in hybrids

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    default_hybrids, genotype_by_id, recommend_breeding, recommend_replacements, resolve,
    BreedingPool, DiseaseResistance, GenotypeId, HybridRecord, TraitLevel, TraitProfile,
    TraitTriple, WeatherObservation, WeatherResult,
};

fn observed_weather() -> WeatherResult {
    WeatherResult::Observed(WeatherObservation {
        location: "Bangalore,IN".to_string(),
        temperature_celsius: Decimal::new(245, 1),
        humidity_percent: 70,
        description: "light rain".to_string(),
    })
}

fn weather_strategy() -> impl Strategy<Value = WeatherResult> {
    prop_oneof![
        Just(observed_weather()),
        Just(WeatherResult::unavailable("Bangalore,IN")),
    ]
}

fn hybrid_strategy() -> impl Strategy<Value = HybridRecord> {
    (
        "[A-Z][a-z]{2,8} F1",
        prop::sample::select(vec!["Resistant", "Moderate", "Susceptible", "Medium"]),
        40u32..120,
    )
        .prop_map(|(name, resistance, maturity_days)| HybridRecord {
            name,
            parent_genotype_ids: vec![],
            maturity_days,
            trait_profile: TraitProfile::new("High", resistance, "Medium"),
        })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: the weakest genotype draws from the broadest pool
    #[test]
    fn test_weakest_genotype_scenario() {
        let record = resolve(TraitTriple::new(
            TraitLevel::Low,
            DiseaseResistance::Susceptible,
            TraitLevel::Low,
        ));
        assert_eq!(BreedingPool::for_genotype(record.genotype_id), BreedingPool::Poor);

        let recommendations = recommend_breeding(record, &observed_weather());
        let allowed = ["G1", "G2", "G3", "G4", "G5", "G10", "G11", "G12"];
        assert!(allowed.contains(&recommendations[0].partner_genotype_id.to_string().as_str()));
    }

    /// Scenario: failed weather sets suitability to 50 everywhere
    #[test]
    fn test_superior_genotype_without_weather() {
        let record = resolve(TraitTriple::new(
            TraitLevel::High,
            DiseaseResistance::Resistant,
            TraitLevel::High,
        ));
        let recommendations =
            recommend_breeding(record, &WeatherResult::unavailable("Bangalore,IN"));
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations.iter().all(|r| r.weather_suitability == 50));
    }

    #[test]
    fn test_replacement_weather_score() {
        let recommendations = recommend_replacements(&[], &observed_weather());
        assert!(recommendations.iter().all(|r| r.weather_score == 75));
        assert_eq!(recommendations[0].total_score, 72);
    }

    #[test]
    fn test_empty_catalog_returns_exactly_defaults() {
        let defaults = default_hybrids();
        let recommendations =
            recommend_replacements(&[], &WeatherResult::unavailable("Bangalore,IN"));
        assert_eq!(recommendations.len(), defaults.len());
        for hybrid in &defaults {
            assert!(recommendations.iter().any(|r| r.hybrid_name == hybrid.name
                && r.parent_genotype_ids == hybrid.parent_genotype_ids
                && r.maturity_days == hybrid.maturity_days));
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// Property: No self-pairing, and exactly three partners survive
        #[test]
        fn prop_breeding_excludes_self(number in 1u8..=27, weather in weather_strategy()) {
            let id = GenotypeId::new(number).unwrap();
            let recommendations = recommend_breeding(genotype_by_id(id), &weather);

            prop_assert!(recommendations.iter().all(|r| r.partner_genotype_id != id));

            let pool_after_exclusion = BreedingPool::for_genotype(id)
                .candidates()
                .iter()
                .take(5)
                .filter(|c| **c != id)
                .count();
            prop_assert_eq!(recommendations.len(), pool_after_exclusion.min(3));
        }

        /// Property: Breeding output is sorted non-increasing and stable
        #[test]
        fn prop_breeding_sorted_and_stable(number in 1u8..=27, weather in weather_strategy()) {
            let id = GenotypeId::new(number).unwrap();
            let recommendations = recommend_breeding(genotype_by_id(id), &weather);
            let pool = BreedingPool::for_genotype(id).candidates();
            let position = |partner: GenotypeId| pool.iter().position(|c| *c == partner);

            for pair in recommendations.windows(2) {
                let (first, second) = (&pair[0], &pair[1]);
                prop_assert!(first.total_score >= second.total_score);
                if first.total_score == second.total_score {
                    prop_assert!(
                        position(first.partner_genotype_id) < position(second.partner_genotype_id)
                    );
                }
            }
        }

        /// Property: Replacement output is sorted, stable and capped at five
        #[test]
        fn prop_replacements_sorted_and_stable(
            catalog in prop::collection::vec(hybrid_strategy(), 0..9),
            weather in weather_strategy(),
        ) {
            let recommendations = recommend_replacements(&catalog, &weather);
            let source = if catalog.is_empty() { default_hybrids() } else { catalog.clone() };

            prop_assert_eq!(recommendations.len(), source.len().min(5));

            // Indices into the scored head of the catalog, in output order
            let mut used = vec![false; source.len()];
            let mut indices = Vec::new();
            for r in &recommendations {
                let index = source
                    .iter()
                    .take(5)
                    .enumerate()
                    .position(|(i, h)| {
                        !used[i] && h.name == r.hybrid_name && h.trait_profile == r.expected_traits
                    });
                prop_assert!(index.is_some());
                let index = index.unwrap();
                used[index] = true;
                indices.push(index);
            }

            for (pair, idx) in recommendations.windows(2).zip(indices.windows(2)) {
                prop_assert!(pair[0].total_score >= pair[1].total_score);
                if pair[0].total_score == pair[1].total_score {
                    prop_assert!(idx[0] < idx[1]);
                }
            }
        }

        /// Property: Recommenders are pure
        #[test]
        fn prop_recommenders_idempotent(
            number in 1u8..=27,
            catalog in prop::collection::vec(hybrid_strategy(), 0..6),
            weather in weather_strategy(),
        ) {
            let record = genotype_by_id(GenotypeId::new(number).unwrap());
            prop_assert_eq!(
                recommend_breeding(record, &weather),
                recommend_breeding(record, &weather)
            );
            prop_assert_eq!(
                recommend_replacements(&catalog, &weather),
                recommend_replacements(&catalog, &weather)
            );
        }
    }
}
