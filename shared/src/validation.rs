//! Validation utilities for analysis requests
//!
//! Uploads and locations are checked here before any prediction runs.

use crate::models::{verify_genotype_table, verify_tier_partition};
use crate::error::CoreResult;

// ============================================================================
// Upload Validations
// ============================================================================

/// Image extensions accepted for leaf uploads
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Maximum accepted upload size (16 MiB)
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Validate an uploaded file name has a supported image extension
pub fn validate_image_filename(filename: &str) -> Result<(), &'static str> {
    if filename.is_empty() {
        return Err("Empty filename");
    }

    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return Err("Invalid file type. Use JPG or PNG"),
    };

    if ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err("Invalid file type. Use JPG or PNG")
    }
}

/// Validate upload content is present and within the size limit
pub fn validate_image_bytes(bytes: &[u8], max_bytes: usize) -> Result<(), &'static str> {
    if bytes.is_empty() {
        return Err("Uploaded file is empty");
    }
    if bytes.len() > max_bytes {
        return Err("Uploaded file is too large");
    }
    Ok(())
}

// ============================================================================
// Location Validations
// ============================================================================

/// Validate a weather location such as `Bangalore,IN`
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Location must be at most 100 characters");
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err("Location contains control characters");
    }
    Ok(())
}

// ============================================================================
// Startup Validations
// ============================================================================

/// Verify the constant genotype and tier tables before serving requests
pub fn verify_static_tables() -> CoreResult<()> {
    verify_genotype_table()?;
    verify_tier_partition()
}
