//! Hybrid cultivar catalog models

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::genotype::GenotypeId;

pub const UNKNOWN_HYBRID_NAME: &str = "Unknown Hybrid";
pub const DEFAULT_MATURITY_DAYS: u32 = 70;

/// Declared trait profile of a hybrid.
///
/// Values are free text because catalogs use coarser grades such as
/// `"Medium-High"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitProfile {
    #[serde(rename = "yield", default, skip_serializing_if = "Option::is_none")]
    pub yield_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_resistance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_tolerance: Option<String>,
}

impl TraitProfile {
    pub fn new(yield_level: &str, disease_resistance: &str, stress_tolerance: &str) -> Self {
        Self {
            yield_level: Some(yield_level.to_string()),
            disease_resistance: Some(disease_resistance.to_string()),
            stress_tolerance: Some(stress_tolerance.to_string()),
        }
    }

    pub fn is_resistant(&self) -> bool {
        self.disease_resistance.as_deref() == Some("Resistant")
    }
}

/// A seed product that can replace the analysed plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridRecord {
    #[serde(default = "unknown_hybrid_name")]
    pub name: String,
    #[serde(rename = "parent_genotypes", default)]
    pub parent_genotype_ids: Vec<GenotypeId>,
    #[serde(default = "default_maturity_days")]
    pub maturity_days: u32,
    #[serde(rename = "traits", default)]
    pub trait_profile: TraitProfile,
}

fn unknown_hybrid_name() -> String {
    UNKNOWN_HYBRID_NAME.to_string()
}

fn default_maturity_days() -> u32 {
    DEFAULT_MATURITY_DAYS
}

/// Built-in hybrids used when the catalog is empty
pub fn default_hybrids() -> Vec<HybridRecord> {
    vec![
        HybridRecord {
            name: "VNR Hybrid Tomato".to_string(),
            parent_genotype_ids: vec![GenotypeId::of(1), GenotypeId::of(2)],
            maturity_days: 65,
            trait_profile: TraitProfile::new("High", "Resistant", "High"),
        },
        HybridRecord {
            name: "Sunvara F1".to_string(),
            parent_genotype_ids: vec![GenotypeId::of(3), GenotypeId::of(4)],
            maturity_days: 70,
            trait_profile: TraitProfile::new("High", "Resistant", "Medium"),
        },
        HybridRecord {
            name: "Syngenta Tomato".to_string(),
            parent_genotype_ids: vec![GenotypeId::of(5), GenotypeId::of(10)],
            maturity_days: 68,
            trait_profile: TraitProfile::new("Medium-High", "Moderate", "High"),
        },
    ]
}

/// Parse a hybrid catalog document.
///
/// Accepts either an object keyed by hybrid ID (document order is kept) or a
/// plain array of records.
pub fn parse_hybrid_catalog(json: &str) -> CoreResult<Vec<HybridRecord>> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CoreError::MalformedCatalog(e.to_string()))?;

    let entries: Vec<serde_json::Value> = match document {
        serde_json::Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
        serde_json::Value::Array(items) => items,
        other => {
            return Err(CoreError::MalformedCatalog(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: HybridRecord = serde_json::from_value(value)
                .map_err(|e| CoreError::MalformedCatalog(format!("entry {}: {}", index, e)))?;
            if record.maturity_days == 0 {
                return Err(CoreError::MalformedCatalog(format!(
                    "entry {}: maturity_days must be positive",
                    index
                )));
            }
            Ok(record)
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hybrids() {
        let defaults = default_hybrids();
        let names: Vec<&str> = defaults.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["VNR Hybrid Tomato", "Sunvara F1", "Syngenta Tomato"]);
        assert!(defaults[0].trait_profile.is_resistant());
        assert!(!defaults[2].trait_profile.is_resistant());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let catalog = parse_hybrid_catalog(r#"[{}]"#).unwrap();
        assert_eq!(catalog[0].name, UNKNOWN_HYBRID_NAME);
        assert!(catalog[0].parent_genotype_ids.is_empty());
        assert_eq!(catalog[0].maturity_days, DEFAULT_MATURITY_DAYS);
        assert_eq!(catalog[0].trait_profile, TraitProfile::default());
    }

    #[test]
    fn test_keyed_catalog_keeps_document_order() {
        let json = r#"{
            "h_zeta": {"name": "Zeta F1", "parent_genotypes": ["G2", "G11"], "maturity_days": 72,
                       "traits": {"yield": "High", "disease_resistance": "Resistant", "stress_tolerance": "Medium"}},
            "h_alpha": {"name": "Alpha F1", "parent_genotypes": ["G4"], "maturity_days": 60}
        }"#;
        let catalog = parse_hybrid_catalog(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "Zeta F1");
        assert_eq!(catalog[1].name, "Alpha F1");
        assert_eq!(catalog[0].parent_genotype_ids[1].to_string(), "G11");
    }

    #[test]
    fn test_malformed_catalogs_rejected() {
        assert!(parse_hybrid_catalog("42").is_err());
        assert!(parse_hybrid_catalog("{not json").is_err());
        assert!(parse_hybrid_catalog(r#"[{"parent_genotypes": ["G99"]}]"#).is_err());
        assert!(parse_hybrid_catalog(r#"[{"maturity_days": 0}]"#).is_err());
    }
}
