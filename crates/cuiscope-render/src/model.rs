#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Addressed,
    Partial,
    Gap,
    NotApplicable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableBoundary {
    Minimal,
    Moderate,
    Extensive,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableSubject {
    pub organization: Option<String>,
    pub assessor: Option<String>,
    pub cage_code: Option<String>,
    pub contract_ref: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub included: bool,
    /// Question ids behind the decision.
    pub rationale: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableControl {
    pub control_id: String,
    pub title: String,
    pub family: String,
    pub status: RenderableStatus,
    /// Answered questions behind the status.
    pub answers: Vec<String>,
    /// Included scope items behind the status.
    pub scope_items: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableAdvisory {
    pub id: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderableCounts {
    pub addressed: u32,
    pub partial: u32,
    pub gap: u32,
    pub not_applicable: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub catalog_id: String,
    pub catalog_version: String,
    /// RFC 3339 timestamp of the assessment.
    pub created_at: String,
    pub subject: RenderableSubject,
    pub answered: usize,
    pub fingerprint: String,
    pub boundary: RenderableBoundary,
    pub required_level: Option<u8>,
    pub items: Vec<RenderableItem>,
    pub controls: Vec<RenderableControl>,
    pub counts: RenderableCounts,
    pub advisories: Vec<RenderableAdvisory>,
}

impl RenderableReport {
    pub fn included_items(&self) -> impl Iterator<Item = &RenderableItem> {
        self.items.iter().filter(|i| i.included)
    }
}

pub(crate) fn boundary_label(boundary: RenderableBoundary) -> &'static str {
    match boundary {
        RenderableBoundary::Minimal => "minimal",
        RenderableBoundary::Moderate => "moderate",
        RenderableBoundary::Extensive => "extensive",
    }
}

pub(crate) fn level_label(level: Option<u8>) -> String {
    match level {
        Some(n) => format!("Level {n}"),
        None => "Not required".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> RenderableReport {
    RenderableReport {
        catalog_id: "cmmc-l2-scoping".to_string(),
        catalog_version: "2025.1".to_string(),
        created_at: "2025-01-01T00:00:00Z".to_string(),
        subject: RenderableSubject {
            organization: Some("Acme Corp".to_string()),
            assessor: Some("J. Doe".to_string()),
            cage_code: None,
            contract_ref: Some("W912-XX".to_string()),
        },
        answered: 3,
        fingerprint: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
            .to_string(),
        boundary: RenderableBoundary::Moderate,
        required_level: Some(2),
        items: vec![
            RenderableItem {
                id: "cui_data".to_string(),
                title: "CUI handled by the organization".to_string(),
                category: "cui".to_string(),
                included: true,
                rationale: vec!["df_01".to_string(), "df_02".to_string()],
            },
            RenderableItem {
                id: "ot_systems".to_string(),
                title: "Operational technology".to_string(),
                category: "ot".to_string(),
                included: false,
                rationale: vec!["si_07".to_string()],
            },
        ],
        controls: vec![
            RenderableControl {
                control_id: "IA.3.083".to_string(),
                title: "Use multifactor authentication".to_string(),
                family: "Identification and Authentication".to_string(),
                status: RenderableStatus::Gap,
                answers: vec!["ac_02".to_string()],
                scope_items: vec!["cui_data".to_string()],
                notes: vec!["Password-only | no MFA".to_string()],
            },
            RenderableControl {
                control_id: "SC.3.183".to_string(),
                title: "Deny network traffic by default".to_string(),
                family: "System and Communications Protection".to_string(),
                status: RenderableStatus::Addressed,
                answers: Vec::new(),
                scope_items: Vec::new(),
                notes: Vec::new(),
            },
        ],
        counts: RenderableCounts {
            addressed: 1,
            partial: 0,
            gap: 1,
            not_applicable: 0,
        },
        advisories: vec![RenderableAdvisory {
            id: "enclave_recommended".to_string(),
            message: "A dedicated CUI enclave is recommended.".to_string(),
        }],
    }
}
