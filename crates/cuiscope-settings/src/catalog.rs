use crate::model::{
    AdvisoryDef, BoundaryDef, CatalogDefV1, CategoryDef, ControlDefV1, ModuleDef, PredicateDef,
    QuestionDef, RuleDef, ScalarDef, ScopeRuleDef,
};
use anyhow::Context;
use cuiscope_domain::model::{
    AdvisoryRule, AnswerType, BoundaryThresholds, ControlDef, ControlRule, Question,
    QuestionModule, RuleStatus, ScopeCategory, ScopeRule,
};
use cuiscope_domain::predicate::{Predicate, Scalar};
use cuiscope_domain::{Catalog, CatalogParts};
use cuiscope_types::SCHEMA_CATALOG_V1;

/// Turn a parsed catalog into a validated [`Catalog`].
pub fn lower_catalog(def: CatalogDefV1) -> anyhow::Result<Catalog> {
    if let Some(schema) = def.schema.as_deref()
        && schema != SCHEMA_CATALOG_V1
    {
        anyhow::bail!("unsupported catalog schema: {schema} (expected {SCHEMA_CATALOG_V1})");
    }

    let thresholds = apply_boundary(BoundaryThresholds::default(), def.boundary.as_ref());

    let parts = CatalogParts {
        id: def.id,
        version: def.version,
        modules: def
            .modules
            .into_iter()
            .map(lower_module)
            .collect::<anyhow::Result<_>>()?,
        categories: def.categories.into_iter().map(lower_category).collect(),
        scope_rules: def
            .scope
            .into_iter()
            .map(lower_scope_rule)
            .collect::<anyhow::Result<_>>()?,
        thresholds,
        controls: def.controls.into_iter().map(lower_control).collect(),
        control_rules: def
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| lower_rule(rule).with_context(|| format!("rules[{i}]")))
            .collect::<anyhow::Result<_>>()?,
        advisories: def
            .advisories
            .into_iter()
            .map(lower_advisory)
            .collect::<anyhow::Result<_>>()?,
    };

    Ok(Catalog::new(parts)?)
}

/// Overlay the values present in `def` on top of `base`.
pub(crate) fn apply_boundary(
    base: BoundaryThresholds,
    def: Option<&BoundaryDef>,
) -> BoundaryThresholds {
    let Some(def) = def else { return base };
    BoundaryThresholds {
        moderate_min_items: def.moderate_min_items.unwrap_or(base.moderate_min_items),
        extensive_min_categories: def
            .extensive_min_categories
            .unwrap_or(base.extensive_min_categories),
    }
}

fn lower_module(def: ModuleDef) -> anyhow::Result<QuestionModule> {
    let module_id = def.id.clone();
    let questions = def
        .questions
        .into_iter()
        .map(lower_question)
        .collect::<anyhow::Result<_>>()
        .with_context(|| format!("module {module_id}"))?;
    Ok(QuestionModule {
        id: def.id,
        title: def.title,
        description: def.description,
        questions,
    })
}

fn lower_question(def: QuestionDef) -> anyhow::Result<Question> {
    let answer_type = parse_answer_type(&def)
        .with_context(|| format!("question {}", def.id))?;
    let depends_on = def
        .depends_on
        .map(lower_predicate)
        .transpose()
        .with_context(|| format!("depends_on of {}", def.id))?;

    let mut question = Question::new(&def.id, &def.text, answer_type);
    question.help = def.help;
    question.depends_on = depends_on;
    question.controls = def.controls;
    question.critical = def.critical;
    Ok(question)
}

fn parse_answer_type(def: &QuestionDef) -> anyhow::Result<AnswerType> {
    let has_bounds = def.min.is_some() || def.max.is_some();
    if has_bounds && def.kind != "number" {
        anyhow::bail!("min/max are only valid for number questions");
    }
    match def.kind.as_str() {
        "boolean" | "bool" => {
            if !def.values.is_empty() {
                anyhow::bail!("boolean questions take no values");
            }
            Ok(AnswerType::Boolean)
        }
        "single_choice" => Ok(AnswerType::SingleChoice {
            values: def.values.clone(),
        }),
        "multi_choice" => Ok(AnswerType::MultiChoice {
            values: def.values.clone(),
        }),
        "text" => Ok(AnswerType::FreeText {
            values: def.values.clone(),
        }),
        "number" => {
            if !def.values.is_empty() {
                anyhow::bail!("number questions take no values");
            }
            Ok(AnswerType::Number {
                min: def.min,
                max: def.max,
            })
        }
        other => anyhow::bail!(
            "unknown question type: {other} (expected boolean|single_choice|multi_choice|text|number)"
        ),
    }
}

fn lower_category(def: CategoryDef) -> ScopeCategory {
    ScopeCategory {
        id: def.id,
        title: def.title,
        high_risk: def.high_risk,
        level: def.level,
    }
}

fn lower_scope_rule(def: ScopeRuleDef) -> anyhow::Result<ScopeRule> {
    let when = lower_predicate(def.when).with_context(|| format!("scope item {}", def.item))?;
    Ok(ScopeRule {
        item: def.item,
        title: def.title,
        category: def.category,
        when,
    })
}

fn lower_control(def: ControlDefV1) -> ControlDef {
    ControlDef {
        id: def.id,
        title: def.title,
        family: def.family,
    }
}

fn lower_rule(def: RuleDef) -> anyhow::Result<ControlRule> {
    let then = parse_rule_status(&def.then)?;
    let otherwise = match def.otherwise.as_deref() {
        Some(s) => parse_rule_status(s)?,
        None => then,
    };
    Ok(ControlRule {
        applies_when: def.applies_when.map(lower_predicate).transpose()?,
        when: def.when.map(lower_predicate).transpose()?,
        control: def.control,
        then,
        otherwise,
        note: def.note,
    })
}

fn lower_advisory(def: AdvisoryDef) -> anyhow::Result<AdvisoryRule> {
    let when = lower_predicate(def.when).with_context(|| format!("advisory {}", def.id))?;
    Ok(AdvisoryRule {
        id: def.id,
        message: def.message,
        when,
    })
}

fn parse_rule_status(v: &str) -> anyhow::Result<RuleStatus> {
    match v {
        "addressed" => Ok(RuleStatus::Addressed),
        "partially_addressed" | "partial" => Ok(RuleStatus::PartiallyAddressed),
        "not_addressed" | "gap" => Ok(RuleStatus::NotAddressed),
        other => anyhow::bail!(
            "unknown rule status: {other} (expected addressed|partially_addressed|not_addressed)"
        ),
    }
}

/// Lower one predicate table. Exactly one form must be present.
pub(crate) fn lower_predicate(def: PredicateDef) -> anyhow::Result<Predicate> {
    let PredicateDef {
        all,
        any,
        in_scope,
        answered,
        question,
        is,
        one_of,
        includes_any,
    } = def;

    let forms = [
        all.is_some(),
        any.is_some(),
        in_scope.is_some(),
        answered.is_some(),
        is.is_some(),
        one_of.is_some(),
        includes_any.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    if forms != 1 {
        anyhow::bail!(
            "predicate must use exactly one of all|any|in_scope|answered|is|one_of|includes_any (found {forms})"
        );
    }

    let needs_question = is.is_some() || one_of.is_some() || includes_any.is_some();
    if question.is_some() && !needs_question {
        anyhow::bail!("`question` is only valid with is|one_of|includes_any");
    }

    if let Some(children) = all {
        return Ok(Predicate::All(lower_children(children)?));
    }
    if let Some(children) = any {
        return Ok(Predicate::Any(lower_children(children)?));
    }
    if let Some(item) = in_scope {
        return Ok(Predicate::InScope(item));
    }
    if let Some(id) = answered {
        return Ok(Predicate::Answered(id));
    }

    let Some(question) = question else {
        anyhow::bail!("is|one_of|includes_any require `question`");
    };
    if let Some(value) = is {
        let value = match value {
            ScalarDef::Bool(b) => Scalar::Bool(b),
            ScalarDef::Number(n) => Scalar::Number(n),
            ScalarDef::Text(s) => Scalar::Text(s),
        };
        return Ok(Predicate::Is { question, value });
    }
    if let Some(values) = one_of {
        return Ok(Predicate::OneOf { question, values });
    }
    match includes_any {
        Some(values) => Ok(Predicate::IncludesAny { question, values }),
        None => anyhow::bail!("predicate has no form"),
    }
}

fn lower_children(children: Vec<PredicateDef>) -> anyhow::Result<Vec<Predicate>> {
    children.into_iter().map(lower_predicate).collect()
}
