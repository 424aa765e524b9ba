//! Predicted plant trait models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// The three traits predicted from a leaf image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    #[serde(rename = "yield")]
    Yield,
    DiseaseResistance,
    StressTolerance,
}

impl TraitKind {
    pub const ALL: [TraitKind; 3] = [
        TraitKind::Yield,
        TraitKind::DiseaseResistance,
        TraitKind::StressTolerance,
    ];

    /// Wire name, matching the classifier output keys
    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Yield => "yield",
            TraitKind::DiseaseResistance => "disease_resistance",
            TraitKind::StressTolerance => "stress_tolerance",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-level scale shared by yield and stress tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitLevel {
    High,
    Medium,
    Low,
}

impl TraitLevel {
    pub const ALL: [TraitLevel; 3] = [TraitLevel::High, TraitLevel::Medium, TraitLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitLevel::High => "High",
            TraitLevel::Medium => "Medium",
            TraitLevel::Low => "Low",
        }
    }

    fn ordinal(self) -> usize {
        match self {
            TraitLevel::High => 0,
            TraitLevel::Medium => 1,
            TraitLevel::Low => 2,
        }
    }

    fn parse_for(kind: TraitKind, label: &str) -> CoreResult<Self> {
        match label {
            "High" => Ok(TraitLevel::High),
            "Medium" => Ok(TraitLevel::Medium),
            "Low" => Ok(TraitLevel::Low),
            other => Err(CoreError::UnknownTraitLabel {
                trait_name: kind.name(),
                label: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disease resistance scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseResistance {
    Resistant,
    Moderate,
    Susceptible,
}

impl DiseaseResistance {
    pub const ALL: [DiseaseResistance; 3] = [
        DiseaseResistance::Resistant,
        DiseaseResistance::Moderate,
        DiseaseResistance::Susceptible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseResistance::Resistant => "Resistant",
            DiseaseResistance::Moderate => "Moderate",
            DiseaseResistance::Susceptible => "Susceptible",
        }
    }

    fn ordinal(self) -> usize {
        match self {
            DiseaseResistance::Resistant => 0,
            DiseaseResistance::Moderate => 1,
            DiseaseResistance::Susceptible => 2,
        }
    }
}

impl fmt::Display for DiseaseResistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseResistance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Resistant" => Ok(DiseaseResistance::Resistant),
            "Moderate" => Ok(DiseaseResistance::Moderate),
            "Susceptible" => Ok(DiseaseResistance::Susceptible),
            other => Err(CoreError::UnknownTraitLabel {
                trait_name: TraitKind::DiseaseResistance.name(),
                label: other.to_string(),
            }),
        }
    }
}

/// A fully classified trait combination; keys the genotype table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitTriple {
    #[serde(rename = "yield")]
    pub yield_level: TraitLevel,
    pub disease_resistance: DiseaseResistance,
    pub stress_tolerance: TraitLevel,
}

impl TraitTriple {
    /// Substituted whenever a prediction cannot be mapped
    pub const DEFAULT: TraitTriple = TraitTriple {
        yield_level: TraitLevel::Medium,
        disease_resistance: DiseaseResistance::Moderate,
        stress_tolerance: TraitLevel::Medium,
    };

    pub const fn new(
        yield_level: TraitLevel,
        disease_resistance: DiseaseResistance,
        stress_tolerance: TraitLevel,
    ) -> Self {
        Self {
            yield_level,
            disease_resistance,
            stress_tolerance,
        }
    }

    /// All 27 combinations in genotype table order
    pub fn all() -> impl Iterator<Item = TraitTriple> {
        TraitLevel::ALL.into_iter().flat_map(|yield_level| {
            DiseaseResistance::ALL.into_iter().flat_map(move |disease_resistance| {
                TraitLevel::ALL
                    .into_iter()
                    .map(move |stress_tolerance| {
                        TraitTriple::new(yield_level, disease_resistance, stress_tolerance)
                    })
            })
        })
    }

    /// Position of this combination in the genotype table (0..27)
    pub fn table_index(&self) -> usize {
        self.yield_level.ordinal() * 9
            + self.disease_resistance.ordinal() * 3
            + self.stress_tolerance.ordinal()
    }
}

impl fmt::Display for TraitTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.yield_level, self.disease_resistance, self.stress_tolerance
        )
    }
}

/// Raw labels as returned by the trait classifiers.
///
/// A trait is `None` when its classifier is not loaded or failed. Labels are
/// kept verbatim so that out-of-vocabulary output is visible to the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedTraits {
    #[serde(rename = "yield", default, skip_serializing_if = "Option::is_none")]
    pub yield_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_resistance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_tolerance: Option<String>,
}

impl PredictedTraits {
    /// Labels of the default triple `(Medium, Moderate, Medium)`
    pub fn default_labels() -> Self {
        Self::from(TraitTriple::DEFAULT)
    }

    /// True when no classifier produced any value
    pub fn is_empty(&self) -> bool {
        self.yield_level.is_none()
            && self.disease_resistance.is_none()
            && self.stress_tolerance.is_none()
    }

    pub fn get(&self, kind: TraitKind) -> Option<&str> {
        match kind {
            TraitKind::Yield => self.yield_level.as_deref(),
            TraitKind::DiseaseResistance => self.disease_resistance.as_deref(),
            TraitKind::StressTolerance => self.stress_tolerance.as_deref(),
        }
    }

    pub fn set(&mut self, kind: TraitKind, label: impl Into<String>) {
        let slot = match kind {
            TraitKind::Yield => &mut self.yield_level,
            TraitKind::DiseaseResistance => &mut self.disease_resistance,
            TraitKind::StressTolerance => &mut self.stress_tolerance,
        };
        *slot = Some(label.into());
    }

    /// Substitute the default labels when nothing was predicted.
    ///
    /// Returns the labels to use and whether the substitution happened. A
    /// partial prediction is returned as-is.
    pub fn or_default_labels(self) -> (Self, bool) {
        if self.is_empty() {
            (Self::default_labels(), true)
        } else {
            (self, false)
        }
    }

    /// Parse the labels into a closed trait triple
    pub fn to_triple(&self) -> CoreResult<TraitTriple> {
        let label = |kind: TraitKind| self.get(kind).ok_or(CoreError::MissingTrait(kind.name()));

        Ok(TraitTriple {
            yield_level: TraitLevel::parse_for(TraitKind::Yield, label(TraitKind::Yield)?)?,
            disease_resistance: label(TraitKind::DiseaseResistance)?.parse()?,
            stress_tolerance: TraitLevel::parse_for(
                TraitKind::StressTolerance,
                label(TraitKind::StressTolerance)?,
            )?,
        })
    }
}

impl From<TraitTriple> for PredictedTraits {
    fn from(triple: TraitTriple) -> Self {
        Self {
            yield_level: Some(triple.yield_level.to_string()),
            disease_resistance: Some(triple.disease_resistance.to_string()),
            stress_tolerance: Some(triple.stress_tolerance.to_string()),
        }
    }
}
