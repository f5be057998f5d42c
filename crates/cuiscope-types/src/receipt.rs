use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers.
pub const SCHEMA_ASSESSMENT_V1: &str = "cuiscope.assessment.v1";
pub const SCHEMA_CATALOG_V1: &str = "cuiscope.catalog.v1";
pub const SCHEMA_CONFIG_V1: &str = "cuiscope.config.v1";
pub const SCHEMA_ANSWERS_V1: &str = "cuiscope.answers.v1";

/// Final status of one control in the coverage map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Addressed,
    PartiallyAddressed,
    NotAddressed,
    NotApplicable,
}

impl CoverageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverageStatus::Addressed => "addressed",
            CoverageStatus::PartiallyAddressed => "partially_addressed",
            CoverageStatus::NotAddressed => "not_addressed",
            CoverageStatus::NotApplicable => "not_applicable",
        }
    }
}

/// Overall size of the assessment boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryClass {
    Minimal,
    Moderate,
    Extensive,
}

impl BoundaryClass {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryClass::Minimal => "minimal",
            BoundaryClass::Moderate => "moderate",
            BoundaryClass::Extensive => "extensive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Who and what the assessment is about. All fields are optional; renderers
/// print whatever is present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cage_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_ref: Option<String>,
}

impl Subject {
    pub fn is_empty(&self) -> bool {
        self.organization.is_none()
            && self.assessor.is_none()
            && self.cage_code.is_none()
            && self.contract_ref.is_none()
    }
}

/// A generic receipt/envelope.
///
/// Keeping this generic lets the domain own the assessment payload while the
/// outer shape stays stable for renderers and downstream tooling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    #[serde(default, skip_serializing_if = "Subject::is_empty")]
    pub subject: Subject,
    pub data: TData,
}
