//! Shared types and models for the AgriGen plant analysis platform
//!
//! This crate holds the genotype resolution and recommendation core. It is
//! pure and synchronous, and is shared between the backend and the browser
//! client (via WASM).

pub mod error;
pub mod models;
pub mod validation;

pub use error::*;
pub use models::*;
pub use validation::*;
