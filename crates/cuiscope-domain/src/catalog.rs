//! The static catalog: questions, scope rules, controls and advisories.
//!
//! A [`Catalog`] can only be obtained through [`Catalog::new`], which runs
//! every load-time check. Downstream code therefore never sees dangling ids
//! or type-mismatched predicates.

use crate::error::CatalogError;
use crate::model::{
    AdvisoryRule, AnswerType, BoundaryThresholds, ControlDef, ControlRule, Question,
    QuestionModule, ScopeCategory, ScopeRule,
};
use crate::predicate::{Predicate, Scalar};
use std::collections::{BTreeMap, BTreeSet};

/// Everything a catalog is built from, before validation.
#[derive(Clone, Debug, Default)]
pub struct CatalogParts {
    pub id: String,
    pub version: String,
    pub modules: Vec<QuestionModule>,
    pub categories: Vec<ScopeCategory>,
    pub scope_rules: Vec<ScopeRule>,
    pub thresholds: BoundaryThresholds,
    pub controls: Vec<ControlDef>,
    pub control_rules: Vec<ControlRule>,
    pub advisories: Vec<AdvisoryRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCatalog {
    id: String,
    version: String,
    modules: Vec<QuestionModule>,
}

impl QuestionCatalog {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn modules(&self) -> &[QuestionModule] {
        &self.modules
    }

    /// All questions in catalog order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.modules.iter().flat_map(|m| m.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.modules.iter().map(|m| m.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeRules {
    categories: Vec<ScopeCategory>,
    rules: Vec<ScopeRule>,
    thresholds: BoundaryThresholds,
}

impl ScopeRules {
    pub fn categories(&self) -> &[ScopeCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&ScopeCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn rules(&self) -> &[ScopeRule] {
        &self.rules
    }

    pub fn thresholds(&self) -> BoundaryThresholds {
        self.thresholds
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlCatalog {
    controls: Vec<ControlDef>,
    rules: Vec<ControlRule>,
}

impl ControlCatalog {
    pub fn controls(&self) -> &[ControlDef] {
        &self.controls
    }

    pub fn control(&self, id: &str) -> Option<&ControlDef> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn rules(&self) -> &[ControlRule] {
        &self.rules
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    questions: QuestionCatalog,
    scope: ScopeRules,
    controls: ControlCatalog,
    advisories: Vec<AdvisoryRule>,
}

impl Catalog {
    pub fn new(parts: CatalogParts) -> Result<Self, CatalogError> {
        validate(&parts)?;
        Ok(Self {
            questions: QuestionCatalog {
                id: parts.id,
                version: parts.version,
                modules: parts.modules,
            },
            scope: ScopeRules {
                categories: parts.categories,
                rules: parts.scope_rules,
                thresholds: parts.thresholds,
            },
            controls: ControlCatalog {
                controls: parts.controls,
                rules: parts.control_rules,
            },
            advisories: parts.advisories,
        })
    }

    pub fn id(&self) -> &str {
        self.questions.id()
    }

    pub fn version(&self) -> &str {
        self.questions.version()
    }

    pub fn questions(&self) -> &QuestionCatalog {
        &self.questions
    }

    pub fn scope_rules(&self) -> &ScopeRules {
        &self.scope
    }

    pub fn controls(&self) -> &ControlCatalog {
        &self.controls
    }

    pub fn advisories(&self) -> &[AdvisoryRule] {
        &self.advisories
    }

    /// Replace the boundary thresholds (deployment override).
    pub fn with_thresholds(mut self, thresholds: BoundaryThresholds) -> Result<Self, CatalogError> {
        check_thresholds(thresholds)?;
        self.scope.thresholds = thresholds;
        Ok(self)
    }
}

fn validate(parts: &CatalogParts) -> Result<(), CatalogError> {
    if parts.id.trim().is_empty() {
        return Err(CatalogError::EmptyField { field: "id" });
    }
    if parts.version.trim().is_empty() {
        return Err(CatalogError::EmptyField { field: "version" });
    }
    if parts.modules.is_empty() {
        return Err(CatalogError::NoModules);
    }

    let questions = validate_questions(&parts.modules)?;
    check_thresholds(parts.thresholds)?;

    let mut categories = BTreeSet::new();
    for category in &parts.categories {
        if !categories.insert(category.id.as_str()) {
            return Err(duplicate("category", &category.id));
        }
    }

    let mut items = BTreeSet::new();
    for rule in &parts.scope_rules {
        if !items.insert(rule.item.as_str()) {
            return Err(duplicate("scope item", &rule.item));
        }
        let context = format!("scope rule {}", rule.item);
        if !categories.contains(rule.category.as_str()) {
            return Err(CatalogError::UnknownCategory {
                context,
                id: rule.category.clone(),
            });
        }
        let refs = Refs {
            questions: &questions,
            items: None,
        };
        check_predicate(&rule.when, &refs, &context)?;
    }

    let mut controls = BTreeSet::new();
    for control in &parts.controls {
        if !controls.insert(control.id.as_str()) {
            return Err(duplicate("control", &control.id));
        }
    }

    let refs = Refs {
        questions: &questions,
        items: Some(&items),
    };
    for (index, rule) in parts.control_rules.iter().enumerate() {
        let context = format!("control rule #{} ({})", index + 1, rule.control);
        if !controls.contains(rule.control.as_str()) {
            return Err(CatalogError::UnknownControl {
                context,
                id: rule.control.clone(),
            });
        }
        for predicate in [&rule.applies_when, &rule.when].into_iter().flatten() {
            check_predicate(predicate, &refs, &context)?;
        }
    }

    let mut advisories = BTreeSet::new();
    for advisory in &parts.advisories {
        if !advisories.insert(advisory.id.as_str()) {
            return Err(duplicate("advisory", &advisory.id));
        }
        check_predicate(&advisory.when, &refs, &format!("advisory {}", advisory.id))?;
    }

    Ok(())
}

fn check_thresholds(thresholds: BoundaryThresholds) -> Result<(), CatalogError> {
    if thresholds.moderate_min_items == 0 || thresholds.extensive_min_categories == 0 {
        return Err(CatalogError::InvalidThresholds {
            moderate_min_items: thresholds.moderate_min_items,
            extensive_min_categories: thresholds.extensive_min_categories,
        });
    }
    Ok(())
}

fn duplicate(kind: &'static str, id: &str) -> CatalogError {
    CatalogError::Duplicate {
        kind,
        id: id.to_string(),
    }
}

/// Validates modules and questions in order, returning every question by id.
fn validate_questions(
    modules: &[QuestionModule],
) -> Result<BTreeMap<&str, &AnswerType>, CatalogError> {
    let mut module_ids = BTreeSet::new();
    let all: BTreeSet<&str> = modules
        .iter()
        .flat_map(|m| m.questions.iter())
        .map(|q| q.id.as_str())
        .collect();
    let mut earlier: BTreeMap<&str, &AnswerType> = BTreeMap::new();

    for module in modules {
        if !module_ids.insert(module.id.as_str()) {
            return Err(duplicate("module", &module.id));
        }
        if module.questions.is_empty() {
            return Err(CatalogError::EmptyModule {
                module: module.id.clone(),
            });
        }

        for question in &module.questions {
            if earlier.contains_key(question.id.as_str()) {
                return Err(duplicate("question", &question.id));
            }
            check_answer_type(question)?;

            if let Some(predicate) = &question.depends_on {
                let context = format!("question {} depends_on", question.id);
                let mut forward = None;
                predicate.visit(&mut |p| {
                    if let Some(q) = p.question()
                        && forward.is_none()
                        && !earlier.contains_key(q)
                        && all.contains(q)
                    {
                        forward = Some(q.to_string());
                    }
                });
                if let Some(id) = forward {
                    return Err(CatalogError::ForwardReference { context, id });
                }
                let refs = Refs {
                    questions: &earlier,
                    items: None,
                };
                check_predicate(predicate, &refs, &context)?;
            }

            earlier.insert(question.id.as_str(), &question.answer_type);
        }
    }

    Ok(earlier)
}

fn check_answer_type(question: &Question) -> Result<(), CatalogError> {
    match &question.answer_type {
        AnswerType::SingleChoice { values } | AnswerType::MultiChoice { values } => {
            if values.is_empty() {
                return Err(CatalogError::NoChoices {
                    question: question.id.clone(),
                });
            }
            check_unique_choices(&question.id, values)
        }
        AnswerType::FreeText { values } => check_unique_choices(&question.id, values),
        AnswerType::Number {
            min: Some(min),
            max: Some(max),
        } if min > max => Err(CatalogError::InvalidRange {
            question: question.id.clone(),
            min: *min,
            max: *max,
        }),
        AnswerType::Boolean | AnswerType::Number { .. } => Ok(()),
    }
}

fn check_unique_choices(question: &str, values: &[String]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(CatalogError::DuplicateChoice {
                question: question.to_string(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// Ids a predicate may reference at a given position.
struct Refs<'a> {
    questions: &'a BTreeMap<&'a str, &'a AnswerType>,
    /// `None` where scope references are not allowed.
    items: Option<&'a BTreeSet<&'a str>>,
}

fn check_predicate(predicate: &Predicate, refs: &Refs<'_>, context: &str) -> Result<(), CatalogError> {
    match predicate {
        Predicate::All(children) | Predicate::Any(children) => {
            if children.is_empty() {
                return Err(CatalogError::EmptyCombinator {
                    context: context.to_string(),
                    combinator: predicate.operator(),
                });
            }
            for child in children {
                check_predicate(child, refs, context)?;
            }
            Ok(())
        }
        Predicate::InScope(item) => match refs.items {
            None => Err(CatalogError::ScopeReferenceNotAllowed {
                context: context.to_string(),
            }),
            Some(items) if !items.contains(item.as_str()) => Err(CatalogError::UnknownScopeItem {
                context: context.to_string(),
                id: item.clone(),
            }),
            Some(_) => Ok(()),
        },
        Predicate::Answered(question) => lookup(refs, question, context).map(|_| ()),
        Predicate::Is { question, value } => {
            let answer_type = lookup(refs, question, context)?;
            let fits = match (value, answer_type) {
                (Scalar::Bool(_), AnswerType::Boolean) => true,
                (Scalar::Number(_), AnswerType::Number { .. }) => true,
                (
                    Scalar::Text(_),
                    AnswerType::SingleChoice { .. } | AnswerType::FreeText { .. },
                ) => true,
                _ => false,
            };
            if !fits {
                return Err(mismatch(predicate, question, answer_type, context));
            }
            if let Scalar::Text(text) = value {
                check_allowed(answer_type, question, text, context)?;
            }
            Ok(())
        }
        Predicate::OneOf { question, values } => {
            let answer_type = lookup(refs, question, context)?;
            if !matches!(
                answer_type,
                AnswerType::SingleChoice { .. } | AnswerType::FreeText { .. }
            ) {
                return Err(mismatch(predicate, question, answer_type, context));
            }
            check_values(predicate, answer_type, question, values, context)
        }
        Predicate::IncludesAny { question, values } => {
            let answer_type = lookup(refs, question, context)?;
            if !matches!(answer_type, AnswerType::MultiChoice { .. }) {
                return Err(mismatch(predicate, question, answer_type, context));
            }
            check_values(predicate, answer_type, question, values, context)
        }
    }
}

fn lookup<'a>(
    refs: &Refs<'a>,
    question: &str,
    context: &str,
) -> Result<&'a AnswerType, CatalogError> {
    refs.questions
        .get(question)
        .copied()
        .ok_or_else(|| CatalogError::UnknownQuestion {
            context: context.to_string(),
            id: question.to_string(),
        })
}

fn mismatch(
    predicate: &Predicate,
    question: &str,
    answer_type: &AnswerType,
    context: &str,
) -> CatalogError {
    CatalogError::OperatorMismatch {
        context: context.to_string(),
        question: question.to_string(),
        operator: predicate.operator(),
        answer_type: answer_type.name(),
    }
}

fn check_values(
    predicate: &Predicate,
    answer_type: &AnswerType,
    question: &str,
    values: &[String],
    context: &str,
) -> Result<(), CatalogError> {
    if values.is_empty() {
        return Err(CatalogError::EmptyCombinator {
            context: context.to_string(),
            combinator: predicate.operator(),
        });
    }
    for value in values {
        check_allowed(answer_type, question, value, context)?;
    }
    Ok(())
}

fn check_allowed(
    answer_type: &AnswerType,
    question: &str,
    value: &str,
    context: &str,
) -> Result<(), CatalogError> {
    if answer_type.allows(value) {
        Ok(())
    } else {
        Err(CatalogError::ValueNotAllowed {
            context: context.to_string(),
            question: question.to_string(),
            value: value.to_string(),
        })
    }
}
