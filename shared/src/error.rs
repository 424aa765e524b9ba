//! Errors raised by the genotype and recommendation core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Genotype IDs must match `G<1-27>`
    #[error("Invalid genotype ID: {0:?}")]
    InvalidGenotypeId(String),

    #[error("Unknown {trait_name} label: {label:?}")]
    UnknownTraitLabel {
        trait_name: &'static str,
        label: String,
    },

    #[error("Missing {0} prediction")]
    MissingTrait(&'static str),

    #[error("Hybrid catalog is malformed: {0}")]
    MalformedCatalog(String),

    /// The constant genotype or tier tables are inconsistent
    #[error("Inconsistent genotype tables: {0}")]
    InconsistentTables(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
