use cuiscope_domain::model::BoundaryThresholds;

pub const DEFAULT_PROFILE: &str = "catalog";

/// Boundary profiles are opinionated threshold presets.
///
/// `catalog` keeps whatever the active catalog declares (`None`).
/// `conservative` classifies a boundary as larger sooner; `lenient` later.
pub fn preset(profile: &str) -> anyhow::Result<Option<BoundaryThresholds>> {
    match profile {
        "catalog" => Ok(None),
        "conservative" => Ok(Some(conservative_profile())),
        "lenient" => Ok(Some(lenient_profile())),
        other => {
            anyhow::bail!("unknown profile: {other} (expected catalog|conservative|lenient)")
        }
    }
}

fn conservative_profile() -> BoundaryThresholds {
    BoundaryThresholds {
        moderate_min_items: 1,
        extensive_min_categories: 2,
    }
}

fn lenient_profile() -> BoundaryThresholds {
    BoundaryThresholds {
        moderate_min_items: 3,
        extensive_min_categories: 4,
    }
}
