//! Declarative predicates over answers and scope inclusion.
//!
//! One language is shared by question dependencies, scope rules, control
//! rules and advisories. Evaluation is three-valued: an atom over a question
//! that has no answer is [`Truth::Unknown`], and `all` / `any` follow Kleene
//! logic.

use crate::answers::AnswerSet;
use crate::classify::ScopeDetermination;
use cuiscope_types::AnswerValue;
use std::collections::BTreeSet;

/// Literal compared by [`Predicate::Is`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    /// The scope item was included. Only valid where a scope determination
    /// exists (control rules, advisories).
    InScope(String),
    /// The question was asked and answered.
    Answered(String),
    Is { question: String, value: Scalar },
    OneOf { question: String, values: Vec<String> },
    IncludesAny { question: String, values: Vec<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    pub fn is_unknown(self) -> bool {
        self == Truth::Unknown
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }
}

/// What a predicate can see while it is evaluated.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    answers: &'a AnswerSet,
    scope: Option<&'a ScopeDetermination>,
}

impl<'a> EvalContext<'a> {
    pub fn answers(answers: &'a AnswerSet) -> Self {
        Self {
            answers,
            scope: None,
        }
    }

    pub fn with_scope(answers: &'a AnswerSet, scope: &'a ScopeDetermination) -> Self {
        Self {
            answers,
            scope: Some(scope),
        }
    }
}

impl Predicate {
    pub fn all(children: Vec<Predicate>) -> Self {
        Predicate::All(children)
    }

    pub fn any(children: Vec<Predicate>) -> Self {
        Predicate::Any(children)
    }

    pub fn in_scope(item: &str) -> Self {
        Predicate::InScope(item.to_string())
    }

    pub fn answered(question: &str) -> Self {
        Predicate::Answered(question.to_string())
    }

    pub fn is(question: &str, value: impl Into<Scalar>) -> Self {
        Predicate::Is {
            question: question.to_string(),
            value: value.into(),
        }
    }

    pub fn one_of(question: &str, values: &[&str]) -> Self {
        Predicate::OneOf {
            question: question.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn includes_any(question: &str, values: &[&str]) -> Self {
        Predicate::IncludesAny {
            question: question.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Truth {
        match self {
            Predicate::All(children) => {
                let mut unknown = false;
                for child in children {
                    match child.evaluate(ctx) {
                        Truth::False => return Truth::False,
                        Truth::Unknown => unknown = true,
                        Truth::True => {}
                    }
                }
                if unknown { Truth::Unknown } else { Truth::True }
            }
            Predicate::Any(children) => {
                let mut unknown = false;
                for child in children {
                    match child.evaluate(ctx) {
                        Truth::True => return Truth::True,
                        Truth::Unknown => unknown = true,
                        Truth::False => {}
                    }
                }
                if unknown { Truth::Unknown } else { Truth::False }
            }
            Predicate::InScope(item) => match ctx.scope {
                Some(scope) => scope.is_included(item).into(),
                None => Truth::Unknown,
            },
            Predicate::Answered(question) => ctx.answers.contains(question).into(),
            Predicate::Is { question, value } => match ctx.answers.get(question) {
                Some(answer) => scalar_matches(answer, value).into(),
                None => Truth::Unknown,
            },
            Predicate::OneOf { question, values } => match ctx.answers.get(question) {
                Some(AnswerValue::Choice(v) | AnswerValue::Text(v)) => values.contains(v).into(),
                Some(_) => Truth::False,
                None => Truth::Unknown,
            },
            Predicate::IncludesAny { question, values } => match ctx.answers.get(question) {
                Some(AnswerValue::Choices(selected)) => {
                    selected.iter().any(|s| values.contains(s)).into()
                }
                Some(_) => Truth::False,
                None => Truth::Unknown,
            },
        }
    }

    /// Question ids of the atoms that make this predicate true.
    ///
    /// Only meaningful when [`Predicate::evaluate`] returned [`Truth::True`];
    /// for `any`, only the true branches contribute.
    pub fn witnesses(&self, ctx: &EvalContext<'_>, out: &mut BTreeSet<String>) {
        match self {
            Predicate::All(children) => {
                for child in children {
                    child.witnesses(ctx, out);
                }
            }
            Predicate::Any(children) => {
                for child in children.iter().filter(|c| c.evaluate(ctx).is_true()) {
                    child.witnesses(ctx, out);
                }
            }
            Predicate::InScope(_) => {}
            Predicate::Answered(question)
            | Predicate::Is { question, .. }
            | Predicate::OneOf { question, .. }
            | Predicate::IncludesAny { question, .. } => {
                if self.evaluate(ctx).is_true() {
                    out.insert(question.clone());
                }
            }
        }
    }

    /// Every question id this predicate mentions.
    pub fn questions(&self, out: &mut BTreeSet<String>) {
        self.visit(&mut |p| {
            if let Some(q) = p.question() {
                out.insert(q.to_string());
            }
        });
    }

    /// Every scope item id this predicate mentions.
    pub fn scope_items(&self, out: &mut BTreeSet<String>) {
        self.visit(&mut |p| {
            if let Predicate::InScope(item) = p {
                out.insert(item.clone());
            }
        });
    }

    /// The question an atom reads, if any.
    pub fn question(&self) -> Option<&str> {
        match self {
            Predicate::Answered(q)
            | Predicate::Is { question: q, .. }
            | Predicate::OneOf { question: q, .. }
            | Predicate::IncludesAny { question: q, .. } => Some(q),
            Predicate::All(_) | Predicate::Any(_) | Predicate::InScope(_) => None,
        }
    }

    /// Operator name as written in catalogs.
    pub fn operator(&self) -> &'static str {
        match self {
            Predicate::All(_) => "all",
            Predicate::Any(_) => "any",
            Predicate::InScope(_) => "in_scope",
            Predicate::Answered(_) => "answered",
            Predicate::Is { .. } => "is",
            Predicate::OneOf { .. } => "one_of",
            Predicate::IncludesAny { .. } => "includes_any",
        }
    }

    /// Pre-order walk over this predicate and all nested predicates.
    pub fn visit(&self, f: &mut dyn FnMut(&Predicate)) {
        f(self);
        if let Predicate::All(children) | Predicate::Any(children) = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

fn scalar_matches(answer: &AnswerValue, value: &Scalar) -> bool {
    match (answer, value) {
        (AnswerValue::Boolean(a), Scalar::Bool(b)) => a == b,
        (AnswerValue::Number(a), Scalar::Number(b)) => a == b,
        (AnswerValue::Choice(a) | AnswerValue::Text(a), Scalar::Text(b)) => a == b,
        _ => false,
    }
}
