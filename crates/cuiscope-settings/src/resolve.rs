use crate::catalog::apply_boundary;
use crate::model::CuiscopeConfigV1;
use crate::presets::{self, DEFAULT_PROFILE};
use anyhow::Context;
use cuiscope_domain::Catalog;
use cuiscope_domain::model::BoundaryThresholds;
use cuiscope_types::{SCHEMA_CONFIG_V1, Subject};

/// Values given on the command line. They win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub catalog: Option<String>,
    pub subject: Subject,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub profile: String,
    /// Catalog path to load; `None` = built-in.
    pub catalog: Option<String>,
    pub boundary: crate::model::BoundaryDef,
    pub subject: Subject,
    preset: Option<BoundaryThresholds>,
}

impl ResolvedConfig {
    /// Effective thresholds: catalog defaults, then profile preset, then
    /// config `[boundary]` values.
    pub fn thresholds(&self, catalog_defaults: BoundaryThresholds) -> BoundaryThresholds {
        let base = self.preset.unwrap_or(catalog_defaults);
        apply_boundary(base, Some(&self.boundary))
    }

    /// Apply the effective thresholds to a loaded catalog.
    pub fn apply(&self, catalog: Catalog) -> anyhow::Result<Catalog> {
        let thresholds = self.thresholds(catalog.scope_rules().thresholds());
        catalog
            .with_thresholds(thresholds)
            .with_context(|| format!("invalid boundary thresholds for profile {}", self.profile))
    }
}

pub fn resolve_config(
    cfg: CuiscopeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    let preset = presets::preset(&profile)?;

    let boundary = cfg.boundary.clone().unwrap_or_default();
    for (name, value) in [
        ("moderate_min_items", boundary.moderate_min_items),
        ("extensive_min_categories", boundary.extensive_min_categories),
    ] {
        if value == Some(0) {
            anyhow::bail!("invalid boundary.{name}: must be at least 1");
        }
    }

    let subject = merge_subject(cfg.subject, overrides.subject);

    Ok(ResolvedConfig {
        profile,
        catalog: overrides.catalog.or(cfg.catalog),
        boundary,
        subject,
        preset,
    })
}

fn merge_subject(file: Subject, cli: Subject) -> Subject {
    Subject {
        organization: cli.organization.or(file.organization),
        assessor: cli.assessor.or(file.assessor),
        cage_code: cli.cage_code.or(file.cage_code),
        contract_ref: cli.contract_ref.or(file.contract_ref),
    }
}
