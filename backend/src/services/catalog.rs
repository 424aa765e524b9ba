//! Hybrid catalog loading

use shared::{parse_hybrid_catalog, HybridRecord};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Read-only list of hybrids offered as replacements
#[derive(Debug, Clone, Default)]
pub struct HybridCatalog {
    hybrids: Vec<HybridRecord>,
}

impl HybridCatalog {
    pub fn new(hybrids: Vec<HybridRecord>) -> Self {
        Self { hybrids }
    }

    /// Load the catalog file. A missing file is an empty catalog.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "Hybrid catalog {} not found, using built-in hybrids",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Catalog(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let hybrids = parse_hybrid_catalog(&contents).map_err(|e| {
            tracing::error!("Hybrid catalog {} rejected: {}", path.display(), e);
            AppError::from(e)
        })?;

        tracing::info!("Loaded {} hybrids from {}", hybrids.len(), path.display());
        Ok(Self { hybrids })
    }

    pub fn hybrids(&self) -> &[HybridRecord] {
        &self.hybrids
    }

    pub fn len(&self) -> usize {
        self.hybrids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hybrids.is_empty()
    }
}
