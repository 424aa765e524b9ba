//! Route definitions for the AgriGen analysis server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Reference data
        .route("/genotypes", get(handlers::list_genotypes))
        // Analysis
        .route("/complete", post(handlers::complete_analysis))
        .route("/analyze", post(handlers::analyze_image))
        .route("/recommend", post(handlers::recommend))
}
