//! HTTP request handlers

pub mod analysis;
pub mod genotypes;
pub mod health;

pub use analysis::{analyze_image, complete_analysis, recommend};
pub use genotypes::list_genotypes;
pub use health::{health_check, root};
