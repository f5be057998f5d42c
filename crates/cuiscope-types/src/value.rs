use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated answer. One variant per answer type.
///
/// Values of this type are produced by validating a [`RawAnswer`] against the
/// question it answers; the variant always matches the question's type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Boolean(bool),
    Choice(String),
    /// Selected values, de-duplicated, in catalog order.
    Choices(Vec<String>),
    Text(String),
    Number(i64),
}

impl AnswerValue {
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::Choice(_) => "single_choice",
            AnswerValue::Choices(_) => "multi_choice",
            AnswerValue::Text(_) => "free_text",
            AnswerValue::Number(_) => "number",
        }
    }

    /// Human-oriented rendering used by reports and prompts.
    pub fn display_text(&self) -> String {
        match self {
            AnswerValue::Boolean(true) => "Yes".to_string(),
            AnswerValue::Boolean(false) => "No".to_string(),
            AnswerValue::Choice(v) | AnswerValue::Text(v) => v.clone(),
            AnswerValue::Choices(vs) => vs.join(", "),
            AnswerValue::Number(n) => n.to_string(),
        }
    }
}

/// Untyped input as supplied by an input provider (terminal, answer file).
///
/// Serialized untagged so answer files read naturally:
/// `true`, `42`, `"Yes — MFA enforced"`, `["DNS servers", "DHCP servers"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawAnswer {
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAnswer::Bool(b) => write!(f, "{b}"),
            RawAnswer::Number(n) => write!(f, "{n}"),
            RawAnswer::Text(s) => write!(f, "{s:?}"),
            RawAnswer::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<&AnswerValue> for RawAnswer {
    fn from(value: &AnswerValue) -> Self {
        match value {
            AnswerValue::Boolean(b) => RawAnswer::Bool(*b),
            AnswerValue::Choice(s) | AnswerValue::Text(s) => RawAnswer::Text(s.clone()),
            AnswerValue::Choices(vs) => RawAnswer::List(vs.clone()),
            AnswerValue::Number(n) => RawAnswer::Number(*n),
        }
    }
}
