//! Genotype reference data

use axum::Json;
use serde::Serialize;
use shared::{genotypes, CompatibilityTier, GenotypeRecord, TraitTriple};

/// A genotype with the traits that map to it and its compatibility tier
#[derive(Serialize)]
pub struct GenotypeSummary {
    #[serde(flatten)]
    pub record: &'static GenotypeRecord,
    pub traits: TraitTriple,
    pub tier: CompatibilityTier,
}

#[derive(Serialize)]
pub struct GenotypeListResponse {
    pub genotypes: Vec<GenotypeSummary>,
    pub total: usize,
}

/// List all genotypes in table order
pub async fn list_genotypes() -> Json<GenotypeListResponse> {
    let genotypes: Vec<GenotypeSummary> = genotypes()
        .iter()
        .map(|record| GenotypeSummary {
            record,
            traits: record.traits,
            tier: CompatibilityTier::of(record.genotype_id),
        })
        .collect();

    Json(GenotypeListResponse {
        total: genotypes.len(),
        genotypes,
    })
}
