use crate::answers::AnswerSet;
use crate::catalog::Catalog;
use crate::classify::{ScopeDetermination, classify};
use crate::fingerprint::answers_fingerprint;
use crate::mapper::{ControlCoverage, CoverageCounts, map_controls};
use crate::model::AdvisoryRule;
use crate::predicate::EvalContext;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogRef {
    pub id: String,
    pub version: String,
}

/// A catalog advisory whose condition held.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Advisory {
    pub id: String,
    pub message: String,
    /// Answered question ids that triggered the advisory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<String>,
}

/// The result of one completed run. Built once by [`assess`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Assessment {
    pub catalog: CatalogRef,
    pub answers: AnswerSet,
    /// SHA-256 over the canonical answer set.
    pub answers_fingerprint: String,
    pub scope: ScopeDetermination,
    pub coverage: ControlCoverage,
    pub summary: CoverageCounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Classify, map and evaluate advisories for a completed answer set.
///
/// Everything except `created_at` is a pure function of `answers` and the
/// catalog.
pub fn assess(catalog: &Catalog, answers: AnswerSet, created_at: OffsetDateTime) -> Assessment {
    let scope = classify(&answers, catalog.scope_rules());
    let coverage = map_controls(&answers, &scope, catalog.controls());
    let advisories = evaluate_advisories(&answers, &scope, catalog.advisories());

    Assessment {
        catalog: CatalogRef {
            id: catalog.id().to_string(),
            version: catalog.version().to_string(),
        },
        answers_fingerprint: answers_fingerprint(&answers),
        summary: coverage.counts(),
        answers,
        scope,
        coverage,
        advisories,
        created_at,
    }
}

/// Advisories whose condition is true, in declaration order.
pub fn evaluate_advisories(
    answers: &AnswerSet,
    scope: &ScopeDetermination,
    rules: &[AdvisoryRule],
) -> Vec<Advisory> {
    let ctx = EvalContext::with_scope(answers, scope);
    rules
        .iter()
        .filter(|rule| rule.when.evaluate(&ctx).is_true())
        .map(|rule| {
            let mut witnesses = BTreeSet::new();
            rule.when.witnesses(&ctx, &mut witnesses);
            Advisory {
                id: rule.id.clone(),
                message: rule.message.clone(),
                answers: witnesses.into_iter().collect(),
            }
        })
        .collect()
}
