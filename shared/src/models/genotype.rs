//! Genotype catalogue and trait-to-genotype resolution

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::models::phenotype::{DiseaseResistance, PredictedTraits, TraitLevel, TraitTriple};

/// Identifier of one of the 27 genotypes, `G1` through `G27`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenotypeId(u8);

impl GenotypeId {
    pub const COUNT: u8 = 27;

    /// Const constructor for the static tables; out-of-range input fails at compile time
    pub(crate) const fn of(number: u8) -> Self {
        assert!(number >= 1 && number <= Self::COUNT);
        Self(number)
    }

    pub fn new(number: u8) -> CoreResult<Self> {
        if (1..=Self::COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CoreError::InvalidGenotypeId(format!("G{}", number)))
        }
    }

    /// Numeric suffix, e.g. `G14` -> 14
    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = GenotypeId> {
        (1..=Self::COUNT).map(GenotypeId)
    }
}

impl fmt::Display for GenotypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl FromStr for GenotypeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidGenotypeId(s.to_string());
        let digits = s.strip_prefix('G').ok_or_else(invalid)?;

        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let number: u8 = digits.parse().map_err(|_| invalid())?;
        Self::new(number).map_err(|_| invalid())
    }
}

impl Serialize for GenotypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenotypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A genotype with its marker genes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenotypeRecord {
    pub genotype_id: GenotypeId,
    pub genes: &'static [&'static str],
    pub description: &'static str,
    #[serde(skip)]
    pub traits: TraitTriple,
}

const fn genotype(
    number: u8,
    traits: (TraitLevel, DiseaseResistance, TraitLevel),
    genes: &'static [&'static str],
    description: &'static str,
) -> GenotypeRecord {
    GenotypeRecord {
        genotype_id: GenotypeId::of(number),
        genes,
        description,
        traits: TraitTriple::new(traits.0, traits.1, traits.2),
    }
}

use DiseaseResistance::{Moderate, Resistant, Susceptible};
use TraitLevel::{High, Low, Medium};

/// All 27 genotypes, ordered so that `GENOTYPES[triple.table_index()]` is the match
#[rustfmt::skip]
static GENOTYPES: [GenotypeRecord; 27] = [
    // High yield
    genotype(1, (High, Resistant, High), &["fw2.2-AA", "HSP-High", "Tm-2a-Present"], "Superior: High yield, resistant and stress tolerant"),
    genotype(2, (High, Resistant, Medium), &["fw2.2-AA", "HSP-Medium", "Tm-2a-Present"], "Excellent: High yield with strong resistance"),
    genotype(3, (High, Resistant, Low), &["fw2.2-AA", "HSP-Low", "Tm-2a-Present"], "High yield, resistant but stress sensitive"),
    genotype(4, (High, Moderate, High), &["fw2.2-Aa", "HSP-High", "Tm-2-Partial"], "High yield, stress tolerant"),
    genotype(5, (High, Moderate, Medium), &["fw2.2-Aa", "HSP-Medium", "Tm-2-Partial"], "Good all-rounder: High yield with balanced traits"),
    genotype(6, (High, Moderate, Low), &["fw2.2-Aa", "HSP-Low", "Tm-2-Partial"], "High yield but needs disease management"),
    genotype(7, (High, Susceptible, High), &["fw2.2-aa", "HSP-High", "Tm-2-Absent"], "High yield, stress tolerant but vulnerable to disease"),
    genotype(8, (High, Susceptible, Medium), &["fw2.2-aa", "HSP-Medium", "Tm-2-Absent"], "High yield but disease prone"),
    genotype(9, (High, Susceptible, Low), &["fw2.2-AA", "HSP-Low", "Tm-2-Absent"], "High yield but very vulnerable"),
    // Medium yield
    genotype(10, (Medium, Resistant, High), &["fw2.2-aa", "HSP-High", "Tm-2a-Present"], "Balanced: Moderate yield, resistant and hardy"),
    genotype(11, (Medium, Resistant, Medium), &["fw2.2-aa", "HSP-Medium", "Tm-2a-Present"], "Moderate yield with good resistance"),
    genotype(12, (Medium, Resistant, Low), &["fw2.2-Aa", "HSP-Low", "Tm-2a-Present"], "Moderate yield, resistant"),
    genotype(13, (Medium, Moderate, High), &["fw2.2-aa", "HSP-High", "Tm-2-Partial"], "Average yield, stress tolerant"),
    genotype(14, (Medium, Moderate, Medium), &["fw2.2-Aa", "HSP-Medium", "Tm-2-Partial"], "Average genotype"),
    genotype(15, (Medium, Moderate, Low), &["fw2.2-aa", "HSP-Low", "Tm-2-Partial"], "Moderate all traits"),
    genotype(16, (Medium, Susceptible, High), &["fw2.2-aa", "HSP-High", "Tm-2-Absent"], "Moderate yield, needs protection"),
    genotype(17, (Medium, Susceptible, Medium), &["fw2.2-Aa", "HSP-Medium", "Tm-2-Absent"], "Average, needs disease management"),
    genotype(18, (Medium, Susceptible, Low), &["fw2.2-aa", "HSP-Low", "Tm-2-Absent"], "Moderate yield, vulnerable"),
    // Low yield
    genotype(19, (Low, Resistant, High), &["fw2.2-aa", "HSP-High", "Tm-2a-Present"], "Low yield but resistant and hardy"),
    genotype(20, (Low, Resistant, Medium), &["fw2.2-aa", "HSP-Medium", "Tm-2a-Present"], "Low yield, good resistance"),
    genotype(21, (Low, Resistant, Low), &["fw2.2-aa", "HSP-Low", "Tm-2a-Present"], "Low yield, resistant"),
    genotype(22, (Low, Moderate, High), &["fw2.2-aa", "HSP-High", "Tm-2-Partial"], "Low yield, stress tolerant"),
    genotype(23, (Low, Moderate, Medium), &["fw2.2-aa", "HSP-Medium", "Tm-2-Partial"], "Low yield, average traits"),
    genotype(24, (Low, Moderate, Low), &["fw2.2-aa", "HSP-Low", "Tm-2-Partial"], "Low yield, weak"),
    genotype(25, (Low, Susceptible, High), &["fw2.2-aa", "HSP-High", "Tm-2-Absent"], "Low yield, susceptible"),
    genotype(26, (Low, Susceptible, Medium), &["fw2.2-aa", "HSP-Medium", "Tm-2-Absent"], "Low yield, vulnerable"),
    genotype(27, (Low, Susceptible, Low), &["fw2.2-aa", "HSP-Low", "Tm-2-Absent"], "Low yield, poor traits"),
];

/// The full genotype table
pub fn genotypes() -> &'static [GenotypeRecord; 27] {
    &GENOTYPES
}

/// Look up a genotype by ID
pub fn genotype_by_id(id: GenotypeId) -> &'static GenotypeRecord {
    &GENOTYPES[usize::from(id.number()) - 1]
}

/// Resolve a classified trait triple to its genotype
pub fn resolve(triple: TraitTriple) -> &'static GenotypeRecord {
    &GENOTYPES[triple.table_index()]
}

/// Outcome of resolving raw classifier labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeResolution {
    pub genotype: &'static GenotypeRecord,
    /// Set when the labels could not be mapped and the default triple was used
    pub fallback: Option<CoreError>,
}

impl GenotypeResolution {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Resolve raw labels, substituting `(Medium, Moderate, Medium)` when they
/// fall outside the fixed vocabulary. Never fails.
pub fn resolve_predicted(traits: &PredictedTraits) -> GenotypeResolution {
    match traits.to_triple() {
        Ok(triple) => GenotypeResolution {
            genotype: resolve(triple),
            fallback: None,
        },
        Err(reason) => GenotypeResolution {
            genotype: resolve(TraitTriple::DEFAULT),
            fallback: Some(reason),
        },
    }
}

/// Check the genotype table is a bijection over all trait triples
pub fn verify_genotype_table() -> CoreResult<()> {
    let mut seen = HashSet::new();

    for (index, record) in GENOTYPES.iter().enumerate() {
        if record.traits.table_index() != index {
            return Err(CoreError::InconsistentTables(format!(
                "{} is stored at position {} but keyed by {}",
                record.genotype_id,
                index,
                record.traits
            )));
        }
        if usize::from(record.genotype_id.number()) != index + 1 {
            return Err(CoreError::InconsistentTables(format!(
                "{} is out of order",
                record.genotype_id
            )));
        }
        if !seen.insert(record.genotype_id) {
            return Err(CoreError::InconsistentTables(format!(
                "duplicate genotype {}",
                record.genotype_id
            )));
        }
    }

    Ok(())
}
