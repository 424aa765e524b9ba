//! Service info and health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Number of trait classifiers available
    pub models_loaded: usize,
    /// Hybrids in the loaded catalog
    pub hybrids_available: usize,
    pub genotypes_mapped: usize,
    pub timestamp: DateTime<Utc>,
}

/// Root endpoint handler
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "AgriGen Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "Active".to_string(),
    })
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: state.predictor.models_loaded(),
        hybrids_available: state.catalog.len(),
        genotypes_mapped: shared::genotypes().len(),
        timestamp: Utc::now(),
    })
}
