//! Catalog and config parsing, profile presets, and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves catalogs and
//! configuration provided as strings.

#![forbid(unsafe_code)]

mod builtin;
mod catalog;
mod model;
mod presets;
mod resolve;

pub use builtin::{BUILTIN_CATALOG_TOML, builtin_catalog};
pub use catalog::lower_catalog;
pub use model::{
    AdvisoryDef, BoundaryDef, CatalogDefV1, CategoryDef, ControlDefV1, CuiscopeConfigV1,
    ModuleDef, PredicateDef, QuestionDef, RuleDef, ScalarDef, ScopeRuleDef,
};
pub use presets::DEFAULT_PROFILE;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse a `cuiscope.catalog.v1` TOML document into its typed model.
pub fn parse_catalog_toml(input: &str) -> anyhow::Result<CatalogDefV1> {
    let def: CatalogDefV1 = toml::from_str(input)?;
    Ok(def)
}

/// Parse and validate a catalog in one step.
pub fn load_catalog_str(input: &str) -> anyhow::Result<cuiscope_domain::Catalog> {
    lower_catalog(parse_catalog_toml(input)?)
}

/// Parse `cuiscope.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<CuiscopeConfigV1> {
    let cfg: CuiscopeConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings (profile + config + CLI overrides).
pub fn resolve_config(
    cfg: CuiscopeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
