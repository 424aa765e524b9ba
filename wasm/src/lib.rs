//! WebAssembly module for the AgriGen plant analysis platform
//!
//! Provides client-side computation for:
//! - Genotype resolution from trait labels
//! - Breeding compatibility scores
//! - Offline recommendation previews
//! - Upload validation

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Resolved genotype as returned to the browser
#[derive(Serialize)]
struct ResolvedGenotype {
    genotype: &'static GenotypeRecord,
    traits: TraitTriple,
    tier: CompatibilityTier,
    fallback: bool,
}

fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn parse_traits(traits_json: &str) -> Result<PredictedTraits, String> {
    let traits: PredictedTraits = serde_json::from_str(traits_json)
        .map_err(|e| format!("Invalid traits JSON: {}", e))?;
    Ok(traits.or_default_labels().0)
}

fn parse_weather(weather_json: &str) -> Result<WeatherResult, String> {
    if weather_json.trim().is_empty() {
        return Ok(WeatherResult::unavailable(""));
    }
    serde_json::from_str(weather_json).map_err(|e| format!("Invalid weather JSON: {}", e))
}

fn parse_catalog(catalog_json: &str) -> Result<Vec<HybridRecord>, String> {
    if catalog_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_hybrid_catalog(catalog_json).map_err(|e| e.to_string())
}

fn resolve_genotype_json(traits_json: &str) -> Result<String, String> {
    let traits = parse_traits(traits_json)?;
    let resolution = resolve_predicted(&traits);
    if let Some(reason) = &resolution.fallback {
        warn(&format!("Using default genotype: {}", reason));
    }

    let resolved = ResolvedGenotype {
        genotype: resolution.genotype,
        traits: resolution.genotype.traits,
        tier: CompatibilityTier::of(resolution.genotype.genotype_id),
        fallback: resolution.is_fallback(),
    };
    serde_json::to_string(&resolved).map_err(|e| e.to_string())
}

fn preview_recommendations_json(
    traits_json: &str,
    weather_json: &str,
    catalog_json: &str,
) -> Result<String, String> {
    let traits = parse_traits(traits_json)?;
    let weather = parse_weather(weather_json)?;
    let catalog = parse_catalog(catalog_json)?;

    let report = analyze_traits(traits, weather, &catalog);
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

/// Resolve trait labels (JSON object) to a genotype
#[wasm_bindgen]
pub fn resolve_genotype(traits_json: &str) -> Result<String, JsValue> {
    resolve_genotype_json(traits_json).map_err(|e| JsValue::from_str(&e))
}

/// Breeding compatibility score (20-100) between two genotype IDs such as `G1`
#[wasm_bindgen]
pub fn genotype_compatibility(user: &str, partner: &str) -> Result<u8, JsValue> {
    compatibility_score_for(user, partner).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Full analysis report from traits, last known weather and a hybrid catalog.
///
/// Empty weather or catalog strings mean unavailable weather and the built-in
/// hybrids.
#[wasm_bindgen]
pub fn preview_recommendations(
    traits_json: &str,
    weather_json: &str,
    catalog_json: &str,
) -> Result<String, JsValue> {
    preview_recommendations_json(traits_json, weather_json, catalog_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// All genotype IDs in table order
#[wasm_bindgen]
pub fn genotype_ids() -> js_sys::Array {
    GenotypeId::all()
        .map(|id| JsValue::from_str(&id.to_string()))
        .collect()
}

/// Check an upload name before sending it to the server
#[wasm_bindgen]
pub fn is_supported_image(filename: &str) -> bool {
    validate_image_filename(filename).is_ok()
}
