use cuiscope_types::Subject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `cuiscope.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CuiscopeConfigV1 {
    /// Optional schema string for tooling (`cuiscope.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Path to a catalog file, relative to the config file. Absent = built-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Boundary profile: `catalog` (default), `conservative`, `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryDef>,

    #[serde(default, skip_serializing_if = "Subject::is_empty")]
    pub subject: Subject,
}

/// Boundary-classification thresholds. Each value is optional so a config
/// can override one without restating the other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoundaryDef {
    /// Included items at or above which the boundary is `moderate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate_min_items: Option<usize>,

    /// Distinct included categories at or above which the boundary is `extensive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensive_min_categories: Option<usize>,
}

/// `cuiscope.catalog.v1`: questions, scope rules, controls and advisories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDefV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub id: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryDef>,

    #[serde(default)]
    pub modules: Vec<ModuleDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryDef>,

    /// Scope items and the rules that include them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<ScopeRuleDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<ControlDefV1>,

    /// Control rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<AdvisoryDef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleDef {
    pub id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub questions: Vec<QuestionDef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionDef {
    pub id: String,
    pub text: String,

    /// `boolean`, `single_choice`, `multi_choice`, `text`, `number`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Allowed values for choice questions; optional closed set for `text`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<PredicateDef>,

    /// Control ids this question informs (informational).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub critical: bool,
}

/// A predicate written as a table with exactly one form:
///
/// - `{ all = [...] }` / `{ any = [...] }`
/// - `{ in_scope = "item" }` / `{ answered = "question" }`
/// - `{ question = "q", is = <bool|int|string> }`
/// - `{ question = "q", one_of = [...] }`
/// - `{ question = "q", includes_any = [...] }`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PredicateDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<PredicateDef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<PredicateDef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is: Option<ScalarDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_any: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScalarDef {
    Bool(bool),
    Number(i64),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryDef {
    pub id: String,
    pub title: String,

    /// Any included item in this category makes the boundary `extensive`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub high_risk: bool,

    /// CMMC level implied by including an item of this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeRuleDef {
    pub item: String,
    pub title: String,
    pub category: String,
    pub when: PredicateDef,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ControlDefV1 {
    pub id: String,
    pub title: String,
    pub family: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleDef {
    pub control: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_when: Option<PredicateDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<PredicateDef>,

    /// `addressed`, `partially_addressed`, `not_addressed`.
    pub then: String,

    /// Defaults to `then`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdvisoryDef {
    pub id: String,
    pub message: String,
    pub when: PredicateDef,
}
