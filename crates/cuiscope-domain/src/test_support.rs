use crate::answers::AnswerSet;
use crate::catalog::{Catalog, CatalogParts};
use crate::error::ValidationError;
use crate::model::{
    BoundaryThresholds, ControlDef, ControlRule, Question, QuestionModule, RuleStatus,
    ScopeCategory, ScopeRule,
};
use crate::predicate::Predicate;
use crate::session::{Input, InputProvider, OnInvalid};
use cuiscope_types::RawAnswer;
use std::collections::VecDeque;

pub fn module(id: &str, questions: Vec<Question>) -> QuestionModule {
    QuestionModule {
        id: id.to_string(),
        title: id.to_string(),
        description: None,
        questions,
    }
}

pub fn category(id: &str, high_risk: bool, level: Option<u8>) -> ScopeCategory {
    ScopeCategory {
        id: id.to_string(),
        title: id.to_string(),
        high_risk,
        level,
    }
}

pub fn scope_rule(item: &str, category: &str, when: Predicate) -> ScopeRule {
    ScopeRule {
        item: item.to_string(),
        title: item.to_string(),
        category: category.to_string(),
        when,
    }
}

pub fn control(id: &str) -> ControlDef {
    ControlDef {
        id: id.to_string(),
        title: format!("{id} title"),
        family: "Test".to_string(),
    }
}

pub fn control_rule(
    control: &str,
    applies_when: Option<Predicate>,
    when: Option<Predicate>,
    then: RuleStatus,
    otherwise: RuleStatus,
) -> ControlRule {
    ControlRule {
        control: control.to_string(),
        applies_when,
        when,
        then,
        otherwise,
        note: None,
    }
}

/// One question, one scope item, one control.
pub fn workstation_parts() -> CatalogParts {
    let mut item = scope_rule("cui_workstation", "endpoint", Predicate::is("ws_cui", true));
    item.title = "CUI Workstation".to_string();

    CatalogParts {
        id: "workstation-test".to_string(),
        version: "1".to_string(),
        modules: vec![module(
            "workstations",
            vec![Question::boolean(
                "ws_cui",
                "Does any workstation process CUI?",
            )],
        )],
        categories: vec![category("endpoint", false, None)],
        scope_rules: vec![item],
        thresholds: BoundaryThresholds::default(),
        controls: vec![control("SC.3.177")],
        control_rules: vec![control_rule(
            "SC.3.177",
            Some(Predicate::in_scope("cui_workstation")),
            None,
            RuleStatus::Addressed,
            RuleStatus::Addressed,
        )],
        advisories: Vec::new(),
    }
}

pub fn workstation_catalog() -> Catalog {
    match Catalog::new(workstation_parts()) {
        Ok(catalog) => catalog,
        Err(err) => panic!("workstation catalog is invalid: {err}"),
    }
}

/// Three boolean triggers across two categories.
pub fn multi_item_parts() -> CatalogParts {
    CatalogParts {
        id: "fleet-test".to_string(),
        version: "1".to_string(),
        modules: vec![module(
            "fleet",
            vec![
                Question::boolean("laptops", "Laptops?"),
                Question::boolean("desktops", "Desktops?"),
                Question::boolean("servers", "Servers?"),
            ],
        )],
        categories: vec![
            category("endpoint", false, None),
            category("infrastructure", false, None),
        ],
        scope_rules: vec![
            scope_rule("laptop_fleet", "endpoint", Predicate::is("laptops", true)),
            scope_rule("desktop_fleet", "endpoint", Predicate::is("desktops", true)),
            scope_rule("server_room", "infrastructure", Predicate::is("servers", true)),
        ],
        thresholds: BoundaryThresholds::default(),
        controls: vec![control("AC.1.001")],
        control_rules: Vec::new(),
        advisories: Vec::new(),
    }
}

/// Five unconditional boolean questions in two modules.
pub fn five_question_parts() -> CatalogParts {
    CatalogParts {
        id: "five-test".to_string(),
        version: "1".to_string(),
        modules: vec![
            module(
                "first",
                vec![
                    Question::boolean("q1", "Q1?"),
                    Question::boolean("q2", "Q2?"),
                    Question::boolean("q3", "Q3?"),
                ],
            ),
            module(
                "second",
                vec![Question::boolean("q4", "Q4?"), Question::boolean("q5", "Q5?")],
            ),
        ],
        ..CatalogParts::default()
    }
}

/// Replays a fixed list of inputs and records what the engine did.
pub struct ScriptedInput {
    inputs: VecDeque<Input>,
    on_invalid: OnInvalid,
    modules: Vec<String>,
    skipped: Vec<String>,
    invalid: usize,
}

impl ScriptedInput {
    pub fn new(inputs: Vec<Input>) -> Self {
        Self {
            inputs: inputs.into(),
            on_invalid: OnInvalid::Reject,
            modules: Vec::new(),
            skipped: Vec::new(),
            invalid: 0,
        }
    }

    pub fn values(values: impl IntoIterator<Item = bool>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|b| Input::Value(RawAnswer::Bool(b)))
                .collect(),
        )
    }

    pub fn resolicit(mut self) -> Self {
        self.on_invalid = OnInvalid::Resolicit;
        self
    }

    pub fn is_drained(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn skipped_ids(&self) -> &[String] {
        &self.skipped
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid
    }
}

impl InputProvider for ScriptedInput {
    fn begin_module(&mut self, module: &QuestionModule) {
        self.modules.push(module.id.clone());
    }

    fn skipped(&mut self, question: &Question) {
        self.skipped.push(question.id.clone());
    }

    fn next_value(&mut self, _question: &Question, _answers: &AnswerSet) -> Input {
        self.inputs.pop_front().unwrap_or(Input::EndOfInput)
    }

    fn on_invalid(&mut self, _question: &Question, _error: &ValidationError) -> OnInvalid {
        self.invalid += 1;
        self.on_invalid
    }
}
