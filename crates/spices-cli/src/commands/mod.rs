pub mod map;
pub mod notation;

use crate::error::Result;
use spices::core::catalog::registry::AminoAcidCatalog;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads the catalog from `path`, or the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<Arc<AminoAcidCatalog>> {
    let catalog = match path {
        Some(path) => {
            info!("Loading amino acid catalog from {:?}", path);
            AminoAcidCatalog::load(path)?
        }
        None => AminoAcidCatalog::builtin()?,
    };
    Ok(Arc::new(catalog))
}
