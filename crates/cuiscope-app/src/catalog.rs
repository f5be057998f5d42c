//! Settings resolution and catalog loading.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cuiscope_domain::Catalog;
use cuiscope_domain::model::AnswerType;
use cuiscope_settings::{CuiscopeConfigV1, Overrides, ResolvedConfig};
use std::fmt;

/// Where the active catalog came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(Utf8PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Builtin => write!(f, "built-in"),
            CatalogSource::File(path) => write!(f, "{path}"),
        }
    }
}

/// Parse config text (empty = defaults) and apply CLI overrides.
pub fn resolve_settings(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        CuiscopeConfigV1::default()
    } else {
        cuiscope_settings::parse_config_toml(config_text).context("parse config")?
    };
    cuiscope_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Load the catalog named by the settings (or the built-in one) and apply
/// the effective boundary thresholds.
///
/// A relative catalog path is resolved against `base_dir`.
pub fn load_catalog(
    resolved: &ResolvedConfig,
    base_dir: &Utf8Path,
) -> anyhow::Result<(Catalog, CatalogSource)> {
    let (catalog, source) = match resolved.catalog.as_deref() {
        Some(path) => {
            let path = base_dir.join(path);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read catalog: {path}"))?;
            let catalog = cuiscope_settings::load_catalog_str(&text)
                .with_context(|| format!("load catalog: {path}"))?;
            (catalog, CatalogSource::File(path))
        }
        None => (cuiscope_settings::builtin_catalog()?, CatalogSource::Builtin),
    };

    let catalog = resolved.apply(catalog)?;
    let thresholds = catalog.scope_rules().thresholds();
    tracing::info!(
        catalog = catalog.id(),
        version = catalog.version(),
        source = %source,
        profile = %resolved.profile,
        questions = catalog.questions().len(),
        controls = catalog.controls().controls().len(),
        moderate_min_items = thresholds.moderate_min_items,
        extensive_min_categories = thresholds.extensive_min_categories,
        "catalog loaded"
    );
    Ok((catalog, source))
}

/// Counts (and optionally every question) of a loaded catalog.
pub fn describe_catalog(catalog: &Catalog, source: &CatalogSource, list: bool) -> String {
    let mut out = String::new();
    let thresholds = catalog.scope_rules().thresholds();

    out.push_str(&format!(
        "catalog {} {} ({source})\n",
        catalog.id(),
        catalog.version()
    ));
    out.push_str(&format!(
        "  modules:     {}\n  questions:   {}\n  scope items: {}\n  categories:  {}\n  controls:    {}\n  rules:       {}\n  advisories:  {}\n",
        catalog.questions().modules().len(),
        catalog.questions().len(),
        catalog.scope_rules().rules().len(),
        catalog.scope_rules().categories().len(),
        catalog.controls().controls().len(),
        catalog.controls().rules().len(),
        catalog.advisories().len(),
    ));
    out.push_str(&format!(
        "  boundary:    moderate >= {} items, extensive >= {} categories\n",
        thresholds.moderate_min_items, thresholds.extensive_min_categories
    ));

    if list {
        for module in catalog.questions().modules() {
            out.push_str(&format!("\n[{}] {}\n", module.id, module.title));
            for q in &module.questions {
                let marker = if q.critical { "*" } else { " " };
                let conditional = if q.depends_on.is_some() { " (conditional)" } else { "" };
                out.push_str(&format!(
                    " {marker}{:<7} {:<13} {}{conditional}\n",
                    q.id,
                    type_label(&q.answer_type),
                    q.text
                ));
            }
        }
    }

    out
}

fn type_label(answer_type: &AnswerType) -> &'static str {
    match answer_type {
        AnswerType::Boolean => "yes/no",
        AnswerType::SingleChoice { .. } => "choice",
        AnswerType::MultiChoice { .. } => "multi-choice",
        AnswerType::FreeText { .. } => "text",
        AnswerType::Number { .. } => "number",
    }
}
