//! Business logic services for the AgriGen analysis server

pub mod analysis;
pub mod catalog;
pub mod prediction;

pub use analysis::{AnalysisOutcome, AnalysisService};
pub use catalog::HybridCatalog;
pub use prediction::TraitPredictor;
