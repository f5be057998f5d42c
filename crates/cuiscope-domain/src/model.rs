use crate::answers::AnswerSet;
use crate::error::{ValidationError, ValidationReason};
use crate::predicate::{EvalContext, Predicate};
use cuiscope_types::{AnswerValue, CoverageStatus, RawAnswer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerType {
    Boolean,
    SingleChoice {
        values: Vec<String>,
    },
    MultiChoice {
        values: Vec<String>,
    },
    /// Free text. When `values` is non-empty the trimmed text must equal one
    /// of them.
    FreeText {
        values: Vec<String>,
    },
    /// Integer with optional inclusive bounds.
    Number {
        min: Option<i64>,
        max: Option<i64>,
    },
}

impl AnswerType {
    pub fn name(&self) -> &'static str {
        match self {
            AnswerType::Boolean => "boolean",
            AnswerType::SingleChoice { .. } => "single_choice",
            AnswerType::MultiChoice { .. } => "multi_choice",
            AnswerType::FreeText { .. } => "free_text",
            AnswerType::Number { .. } => "number",
        }
    }

    /// Allowed values for choice and enumerated free-text questions.
    pub fn values(&self) -> &[String] {
        match self {
            AnswerType::SingleChoice { values }
            | AnswerType::MultiChoice { values }
            | AnswerType::FreeText { values } => values,
            AnswerType::Boolean | AnswerType::Number { .. } => &[],
        }
    }

    /// Whether `value` may appear as an answer (or literal) for this type.
    /// Open free text accepts anything.
    pub fn allows(&self, value: &str) -> bool {
        match self {
            AnswerType::FreeText { values } if values.is_empty() => true,
            other => other.values().iter().any(|v| v == value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub help: Option<String>,
    pub answer_type: AnswerType,
    /// Evaluated against earlier answers; the question is asked only when
    /// this is true.
    pub depends_on: Option<Predicate>,
    /// Control ids the question informs. Informational only.
    pub controls: Vec<String>,
    /// Highlighted by renderers.
    pub critical: bool,
}

impl Question {
    pub fn new(id: &str, text: &str, answer_type: AnswerType) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            help: None,
            answer_type,
            depends_on: None,
            controls: Vec::new(),
            critical: false,
        }
    }

    pub fn boolean(id: &str, text: &str) -> Self {
        Self::new(id, text, AnswerType::Boolean)
    }

    pub fn single_choice(id: &str, text: &str, values: &[&str]) -> Self {
        Self::new(
            id,
            text,
            AnswerType::SingleChoice {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    pub fn multi_choice(id: &str, text: &str, values: &[&str]) -> Self {
        Self::new(
            id,
            text,
            AnswerType::MultiChoice {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    pub fn depends_on(mut self, predicate: Predicate) -> Self {
        self.depends_on = Some(predicate);
        self
    }

    /// Whether the question should be asked given the answers so far.
    pub fn is_enabled(&self, answers: &AnswerSet) -> bool {
        match &self.depends_on {
            Some(predicate) => predicate.evaluate(&EvalContext::answers(answers)).is_true(),
            None => true,
        }
    }

    /// Validate provider input against this question's type.
    pub fn accept(&self, raw: &RawAnswer) -> Result<AnswerValue, ValidationError> {
        self.accept_inner(raw).map_err(|reason| ValidationError {
            question_id: self.id.clone(),
            rejected: raw.to_string(),
            reason,
        })
    }

    fn accept_inner(&self, raw: &RawAnswer) -> Result<AnswerValue, ValidationReason> {
        let wrong_type = || ValidationReason::WrongType {
            expected: self.answer_type.name(),
        };

        match &self.answer_type {
            AnswerType::Boolean => match raw {
                RawAnswer::Bool(b) => Ok(AnswerValue::Boolean(*b)),
                RawAnswer::Text(s) => parse_yes_no(s)
                    .map(AnswerValue::Boolean)
                    .ok_or_else(wrong_type),
                RawAnswer::Number(_) | RawAnswer::List(_) => Err(wrong_type()),
            },
            AnswerType::SingleChoice { values } => match raw {
                RawAnswer::Text(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        return Err(ValidationReason::Empty);
                    }
                    values
                        .iter()
                        .find(|v| v.as_str() == s)
                        .map(|v| AnswerValue::Choice(v.clone()))
                        .ok_or_else(|| ValidationReason::NotAllowed {
                            value: s.to_string(),
                        })
                }
                _ => Err(wrong_type()),
            },
            AnswerType::MultiChoice { values } => {
                let selected: Vec<&str> = match raw {
                    RawAnswer::List(items) => items.iter().map(|s| s.trim()).collect(),
                    RawAnswer::Text(s) => vec![s.trim()],
                    RawAnswer::Bool(_) | RawAnswer::Number(_) => return Err(wrong_type()),
                };
                if selected.is_empty() || selected.iter().all(|s| s.is_empty()) {
                    return Err(ValidationReason::Empty);
                }
                if let Some(bad) = selected.iter().find(|s| !values.iter().any(|v| v == *s)) {
                    return Err(ValidationReason::NotAllowed {
                        value: bad.to_string(),
                    });
                }
                // Catalog order, duplicates collapsed.
                Ok(AnswerValue::Choices(
                    values
                        .iter()
                        .filter(|v| selected.contains(&v.as_str()))
                        .cloned()
                        .collect(),
                ))
            }
            AnswerType::FreeText { .. } => match raw {
                RawAnswer::Text(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        Err(ValidationReason::Empty)
                    } else if !self.answer_type.allows(s) {
                        Err(ValidationReason::NotAllowed {
                            value: s.to_string(),
                        })
                    } else {
                        Ok(AnswerValue::Text(s.to_string()))
                    }
                }
                _ => Err(wrong_type()),
            },
            AnswerType::Number { min, max } => {
                let value = match raw {
                    RawAnswer::Number(n) => *n,
                    RawAnswer::Text(s) if s.trim().is_empty() => {
                        return Err(ValidationReason::Empty);
                    }
                    RawAnswer::Text(s) => s.trim().parse::<i64>().map_err(|_| wrong_type())?,
                    RawAnswer::Bool(_) | RawAnswer::List(_) => return Err(wrong_type()),
                };
                let below = min.is_some_and(|lo| value < lo);
                let above = max.is_some_and(|hi| value > hi);
                if below || above {
                    return Err(ValidationReason::OutOfRange {
                        value,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(AnswerValue::Number(value))
            }
        }
    }
}

fn parse_yes_no(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionModule {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeCategory {
    pub id: String,
    pub title: String,
    /// Inclusion of any item in this category makes the boundary extensive.
    pub high_risk: bool,
    /// CMMC level implied by inclusion.
    pub level: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeRule {
    pub item: String,
    pub title: String,
    pub category: String,
    pub when: Predicate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryThresholds {
    pub moderate_min_items: usize,
    pub extensive_min_categories: usize,
}

impl Default for BoundaryThresholds {
    fn default() -> Self {
        Self {
            moderate_min_items: 2,
            extensive_min_categories: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlDef {
    pub id: String,
    pub title: String,
    pub family: String,
}

/// Status a single control rule resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleStatus {
    Addressed,
    PartiallyAddressed,
    NotAddressed,
}

impl From<RuleStatus> for CoverageStatus {
    fn from(value: RuleStatus) -> Self {
        match value {
            RuleStatus::Addressed => CoverageStatus::Addressed,
            RuleStatus::PartiallyAddressed => CoverageStatus::PartiallyAddressed,
            RuleStatus::NotAddressed => CoverageStatus::NotAddressed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlRule {
    pub control: String,
    /// Precondition; the rule is ignored unless this is true. Absent = true.
    pub applies_when: Option<Predicate>,
    /// Condition selecting `then` over `otherwise`. Absent = always holds.
    pub when: Option<Predicate>,
    pub then: RuleStatus,
    pub otherwise: RuleStatus,
    /// Surfaced when the rule resolves to anything but addressed.
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryRule {
    pub id: String,
    pub message: String,
    pub when: Predicate,
}
