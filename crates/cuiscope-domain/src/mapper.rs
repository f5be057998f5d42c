use crate::answers::AnswerSet;
use crate::catalog::ControlCatalog;
use crate::classify::ScopeDetermination;
use crate::model::{ControlRule, RuleStatus};
use crate::predicate::{EvalContext, Truth};
use cuiscope_types::CoverageStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageEntry {
    pub control_id: String,
    pub title: String,
    pub family: String,
    pub status: CoverageStatus,
    /// Answered questions referenced by the contributing rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<String>,
    /// Included scope items referenced by the contributing rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageCounts {
    pub addressed: u32,
    pub partially_addressed: u32,
    pub not_addressed: u32,
    pub not_applicable: u32,
}

impl CoverageCounts {
    pub fn from_entries(entries: &[CoverageEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match entry.status {
                CoverageStatus::Addressed => counts.addressed += 1,
                CoverageStatus::PartiallyAddressed => counts.partially_addressed += 1,
                CoverageStatus::NotAddressed => counts.not_addressed += 1,
                CoverageStatus::NotApplicable => counts.not_applicable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.addressed + self.partially_addressed + self.not_addressed + self.not_applicable
    }
}

/// One entry per declared control, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ControlCoverage(Vec<CoverageEntry>);

impl ControlCoverage {
    pub fn entries(&self) -> &[CoverageEntry] {
        &self.0
    }

    pub fn get(&self, control_id: &str) -> Option<&CoverageEntry> {
        self.0.iter().find(|e| e.control_id == control_id)
    }

    pub fn status(&self, control_id: &str) -> Option<CoverageStatus> {
        self.get(control_id).map(|e| e.status)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn counts(&self) -> CoverageCounts {
        CoverageCounts::from_entries(&self.0)
    }
}

pub fn map_controls(
    answers: &AnswerSet,
    scope: &ScopeDetermination,
    catalog: &ControlCatalog,
) -> ControlCoverage {
    let ctx = EvalContext::with_scope(answers, scope);

    let entries = catalog
        .controls()
        .iter()
        .map(|control| {
            let mut statuses = Vec::new();
            let mut referenced_questions = BTreeSet::new();
            let mut referenced_items = BTreeSet::new();
            let mut notes = Vec::new();

            for rule in catalog.rules().iter().filter(|r| r.control == control.id) {
                let Some(status) = resolve_rule(rule, &ctx) else {
                    continue;
                };
                statuses.push(status);
                for predicate in [&rule.applies_when, &rule.when].into_iter().flatten() {
                    predicate.questions(&mut referenced_questions);
                    predicate.scope_items(&mut referenced_items);
                }
                if status != RuleStatus::Addressed
                    && let Some(note) = &rule.note
                    && !notes.contains(note)
                {
                    notes.push(note.clone());
                }
            }

            CoverageEntry {
                control_id: control.id.clone(),
                title: control.title.clone(),
                family: control.family.clone(),
                status: combine(&statuses),
                answers: referenced_questions
                    .into_iter()
                    .filter(|q| answers.contains(q))
                    .collect(),
                scope_items: referenced_items
                    .into_iter()
                    .filter(|i| scope.is_included(i))
                    .collect(),
                notes,
            }
        })
        .collect();

    ControlCoverage(entries)
}

/// Status a rule contributes, or `None` when it does not apply or its
/// condition cannot be decided from the answers.
fn resolve_rule(rule: &ControlRule, ctx: &EvalContext<'_>) -> Option<RuleStatus> {
    let applies = rule
        .applies_when
        .as_ref()
        .map_or(Truth::True, |p| p.evaluate(ctx));
    if !applies.is_true() {
        return None;
    }
    match rule.when.as_ref().map_or(Truth::True, |p| p.evaluate(ctx)) {
        Truth::True => Some(rule.then),
        Truth::False => Some(rule.otherwise),
        Truth::Unknown => None,
    }
}

/// Combine contributing rule statuses into the control's final status.
pub fn combine(statuses: &[RuleStatus]) -> CoverageStatus {
    if statuses.is_empty() {
        CoverageStatus::NotApplicable
    } else if statuses.contains(&RuleStatus::NotAddressed) {
        CoverageStatus::NotAddressed
    } else if statuses.iter().all(|s| *s == RuleStatus::Addressed) {
        CoverageStatus::Addressed
    } else {
        CoverageStatus::PartiallyAddressed
    }
}
