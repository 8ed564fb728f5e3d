//! Load a catalog file (YAML or JSON by extension). Graceful fallback to the
//! built-in dataset when the file is missing or malformed.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::data::catalog::Catalog;
use crate::data::defaults::builtin_catalog;

/// Errors raised while reading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unable to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported catalog extension '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogFormat {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> Result<CatalogFormat, CatalogError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "yaml" | "yml" => Ok(CatalogFormat::Yaml),
        "json" => Ok(CatalogFormat::Json),
        _ => Err(CatalogError::UnsupportedFormat(ext)),
    }
}

/// Parse YAML catalog text and compile its effect text.
pub fn parse_catalog_yaml(raw: &str) -> Result<Catalog, CatalogError> {
    let mut catalog: Catalog = serde_yaml::from_str(raw)?;
    catalog.compile_effects();
    Ok(catalog)
}

pub fn parse_catalog_json(raw: &str) -> Result<Catalog, CatalogError> {
    let mut catalog: Catalog = serde_json::from_str(raw)?;
    catalog.compile_effects();
    Ok(catalog)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = match format {
        CatalogFormat::Yaml => parse_catalog_yaml(&raw)?,
        CatalogFormat::Json => parse_catalog_json(&raw)?,
    };
    tracing::debug!(
        path = %path.display(),
        classes = catalog.classes.len(),
        talents = catalog.talents.len(),
        factors = catalog.factors.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Load `path` when given, otherwise (or on failure) use the built-in catalog.
pub fn load_catalog_or_default(path: Option<&str>) -> Catalog {
    let Some(path) = path else {
        return builtin_catalog();
    };
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(%err, "falling back to built-in catalog");
            builtin_catalog()
        }
    }
}
