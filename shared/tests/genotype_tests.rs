//! Genotype resolution and compatibility tests
//!
//! Tests for the constant tables including:
//! - Property 1: Every trait triple resolves to a distinct genotype
//! - Property 2: Unmapped labels resolve like the default triple
//! - Property 3: Compatibility scores stay within 20..=100

use proptest::prelude::*;
use shared::{
    compatibility_score, compatibility_score_for, genotypes, resolve, resolve_predicted,
    CompatibilityTier, CoreError, DiseaseResistance, GenotypeId, PredictedTraits, TraitLevel,
    TraitTriple,
};
use std::collections::HashSet;

fn g(number: u8) -> GenotypeId {
    GenotypeId::new(number).unwrap()
}

fn label_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        prop::sample::select(vec![
            "High",
            "Medium",
            "Low",
            "Resistant",
            "Moderate",
            "Susceptible",
            "Medium-High",
            "",
            "high",
        ])
        .prop_map(|s| Some(s.to_string())),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test all 27 triples map to 27 distinct genotypes
    #[test]
    fn test_resolution_is_bijective() {
        let ids: HashSet<GenotypeId> = TraitTriple::all().map(|t| resolve(t).genotype_id).collect();
        assert_eq!(ids.len(), 27);
        assert_eq!(ids, GenotypeId::all().collect::<HashSet<_>>());
    }

    /// Test the table record matches the triple it is keyed by
    #[test]
    fn test_resolved_record_carries_its_triple() {
        for triple in TraitTriple::all() {
            assert_eq!(resolve(triple).traits, triple);
        }
    }

    #[test]
    fn test_superior_scenario() {
        let record = resolve(TraitTriple::new(
            TraitLevel::High,
            DiseaseResistance::Resistant,
            TraitLevel::High,
        ));
        assert_eq!(record.genotype_id, g(1));
        assert!(record.description.contains("Superior"));
    }

    #[test]
    fn test_weakest_scenario() {
        let record = resolve(TraitTriple::new(
            TraitLevel::Low,
            DiseaseResistance::Susceptible,
            TraitLevel::Low,
        ));
        assert_eq!(record.genotype_id, g(27));
    }

    #[test]
    fn test_out_of_vocabulary_falls_back() {
        let traits = PredictedTraits {
            yield_level: Some("Medium-High".into()),
            disease_resistance: Some("Resistant".into()),
            stress_tolerance: Some("High".into()),
        };
        let resolution = resolve_predicted(&traits);
        assert_eq!(resolution.genotype, resolve(TraitTriple::DEFAULT));
        assert_eq!(
            resolution.fallback,
            Some(CoreError::UnknownTraitLabel {
                trait_name: "yield",
                label: "Medium-High".into(),
            })
        );
    }

    #[test]
    fn test_table_exposes_all_records_in_order() {
        let ids: Vec<String> = genotypes().iter().map(|r| r.genotype_id.to_string()).collect();
        assert_eq!(ids.first().map(String::as_str), Some("G1"));
        assert_eq!(ids.last().map(String::as_str), Some("G27"));
        assert_eq!(ids.len(), 27);
    }

    #[test]
    fn test_documented_scores() {
        assert_eq!(compatibility_score_for("G1", "G1"), Ok(95));
        assert_eq!(compatibility_score_for("G14", "G20"), Ok(82));
    }

    #[test]
    fn test_malformed_ids_fail_loudly() {
        for bad in ["G0", "G28", "14", "G-1", "G1.5"] {
            assert!(matches!(
                compatibility_score_for(bad, "G1"),
                Err(CoreError::InvalidGenotypeId(_))
            ));
        }
    }

    #[test]
    fn test_superior_self_score() {
        for id in CompatibilityTier::Superior.members() {
            assert_eq!(compatibility_score(id, id), 95);
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
        /// Property: Compatibility is bounded for every valid pair
        #[test]
        fn prop_score_bounded(a in 1u8..=27, b in 1u8..=27) {
            let score = compatibility_score(g(a), g(b));
            prop_assert!((20..=100).contains(&score));
        }

        /// Property: Scoring is deterministic
        #[test]
        fn prop_score_idempotent(a in 1u8..=27, b in 1u8..=27) {
            prop_assert_eq!(compatibility_score(g(a), g(b)), compatibility_score(g(a), g(b)));
        }

        /// Property: Outside the top two tiers the score depends only on ID distance
        #[test]
        fn prop_distance_rule(a in 1u8..=27, b in 1u8..=27) {
            let tier = CompatibilityTier::of(g(a));
            prop_assume!(
                tier != CompatibilityTier::Superior && tier != CompatibilityTier::Excellent
            );

            let expected = 100i32 - 3 * (i32::from(a) - i32::from(b)).abs();
            prop_assert_eq!(i32::from(compatibility_score(g(a), g(b))), expected.max(20));
        }

        /// Property: Any labels resolve, and unmappable ones resolve like the default triple
        #[test]
        fn prop_resolution_never_fails(
            yield_level in label_strategy(),
            disease_resistance in label_strategy(),
            stress_tolerance in label_strategy(),
        ) {
            let traits = PredictedTraits { yield_level, disease_resistance, stress_tolerance };
            let resolution = resolve_predicted(&traits);

            match traits.to_triple() {
                Ok(triple) => {
                    prop_assert!(!resolution.is_fallback());
                    prop_assert_eq!(resolution.genotype, resolve(triple));
                }
                Err(_) => {
                    prop_assert!(resolution.is_fallback());
                    prop_assert_eq!(resolution.genotype, resolve(TraitTriple::DEFAULT));
                }
            }
        }

        /// Property: Genotype IDs survive display and parse
        #[test]
        fn prop_genotype_id_display_parses(number in 1u8..=27) {
            let id = g(number);
            prop_assert_eq!(id.to_string().parse::<GenotypeId>(), Ok(id));
        }
    }
}
