use crate::answers::AnswerSet;
use crate::catalog::ScopeRules;
use crate::predicate::EvalContext;
use cuiscope_types::BoundaryClass;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub included: bool,
    /// Answered question ids whose conditions held. Empty when excluded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rationale: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeDetermination {
    /// One entry per scope rule, in declaration order.
    pub items: Vec<ScopeItem>,
    pub boundary: BoundaryClass,
    /// Highest CMMC level implied by an included category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_level: Option<u8>,
}

impl ScopeDetermination {
    pub fn is_included(&self, item: &str) -> bool {
        self.items.iter().any(|i| i.id == item && i.included)
    }

    pub fn item(&self, id: &str) -> Option<&ScopeItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn included(&self) -> impl Iterator<Item = &ScopeItem> {
        self.items.iter().filter(|i| i.included)
    }
}

/// Evaluate every scope rule against the answers.
///
/// Never fails: a rule over a skipped question evaluates to unknown and the
/// item is simply not included.
pub fn classify(answers: &AnswerSet, rules: &ScopeRules) -> ScopeDetermination {
    let ctx = EvalContext::answers(answers);

    let items: Vec<ScopeItem> = rules
        .rules()
        .iter()
        .map(|rule| {
            let included = rule.when.evaluate(&ctx).is_true();
            let mut rationale = BTreeSet::new();
            if included {
                rule.when.witnesses(&ctx, &mut rationale);
            }
            ScopeItem {
                id: rule.item.clone(),
                title: rule.title.clone(),
                category: rule.category.clone(),
                included,
                rationale: rationale.into_iter().collect(),
            }
        })
        .collect();

    let boundary = boundary_class(&items, rules);
    let required_level = required_level(&items, rules);

    ScopeDetermination {
        items,
        boundary,
        required_level,
    }
}

/// First matching rule wins:
/// nothing included, high-risk category, category spread, item count.
pub fn boundary_class(items: &[ScopeItem], rules: &ScopeRules) -> BoundaryClass {
    let included: Vec<&ScopeItem> = items.iter().filter(|i| i.included).collect();
    if included.is_empty() {
        return BoundaryClass::Minimal;
    }

    let high_risk = included.iter().any(|item| {
        rules
            .category(&item.category)
            .is_some_and(|category| category.high_risk)
    });
    if high_risk {
        return BoundaryClass::Extensive;
    }

    let thresholds = rules.thresholds();
    let categories: BTreeSet<&str> = included.iter().map(|i| i.category.as_str()).collect();
    if categories.len() >= thresholds.extensive_min_categories {
        return BoundaryClass::Extensive;
    }
    if included.len() >= thresholds.moderate_min_items {
        return BoundaryClass::Moderate;
    }
    BoundaryClass::Minimal
}

fn required_level(items: &[ScopeItem], rules: &ScopeRules) -> Option<u8> {
    items
        .iter()
        .filter(|i| i.included)
        .filter_map(|i| rules.category(&i.category).and_then(|c| c.level))
        .max()
}
