//! Domain models for plant genotype analysis

mod analysis;
mod breeding;
mod compatibility;
mod genotype;
mod hybrid;
mod phenotype;
mod replacement;
mod scoring;
mod weather;

pub use analysis::*;
pub use breeding::*;
pub use compatibility::*;
pub use genotype::*;
pub use hybrid::*;
pub use phenotype::*;
pub use replacement::*;
pub use scoring::*;
pub use weather::*;
