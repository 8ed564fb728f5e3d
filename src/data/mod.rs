pub mod catalog;
pub mod defaults;
pub mod loader;
pub mod types;
pub mod validate;

pub use catalog::Catalog;
pub use defaults::builtin_catalog;
pub use loader::{load_catalog, load_catalog_or_default, CatalogError};
pub use validate::{
    validate_catalog, validate_loadout, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};
