use anyhow::Context;
use cuiscope_domain::Catalog;

/// Source of the built-in CMMC Level 2 scoping catalog.
pub const BUILTIN_CATALOG_TOML: &str = include_str!("../catalogs/cmmc-l2-scoping.toml");

/// Load the built-in catalog through the same path as user catalogs.
pub fn builtin_catalog() -> anyhow::Result<Catalog> {
    crate::load_catalog_str(BUILTIN_CATALOG_TOML).context("built-in catalog")
}
