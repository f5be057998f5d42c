use thiserror::Error;

/// Why a provided value was rejected for a question.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("expected a {expected} answer")]
    WrongType { expected: &'static str },

    #[error("{value:?} is not one of the allowed values")]
    NotAllowed { value: String },

    #[error("an answer is required")]
    Empty,

    #[error("{value} is outside the allowed range {}", describe_range(.min, .max))]
    OutOfRange {
        value: i64,
        min: Option<i64>,
        max: Option<i64>,
    },
}

fn describe_range(min: &Option<i64>, max: &Option<i64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo}..={hi}"),
        (Some(lo), None) => format!(">= {lo}"),
        (None, Some(hi)) => format!("<= {hi}"),
        (None, None) => "(unbounded)".to_string(),
    }
}

/// An answer failed its question's type or allowed-value check.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid answer for {question_id}: {rejected} ({reason})")]
pub struct ValidationError {
    pub question_id: String,
    /// The rejected input, as supplied.
    pub rejected: String,
    pub reason: ValidationReason,
}

/// A questionnaire session ended without producing an answer set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "input ended before question {question_id} was answered ({answered} answers collected)"
    )]
    Incomplete { question_id: String, answered: usize },

    #[error("session aborted at question {question_id}")]
    Aborted { question_id: String },
}

impl SessionError {
    /// The question the session stopped at.
    pub fn question_id(&self) -> &str {
        match self {
            SessionError::Validation(err) => &err.question_id,
            SessionError::Incomplete { question_id, .. } => question_id,
            SessionError::Aborted { question_id } => question_id,
        }
    }
}

/// Structural defect in a static catalog, detected at load time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("catalog declares no question modules")]
    NoModules,

    #[error("module {module} has no questions")]
    EmptyModule { module: String },

    #[error("duplicate {kind} id: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("question {question} declares no choices")]
    NoChoices { question: String },

    #[error("question {question} lists choice {value:?} more than once")]
    DuplicateChoice { question: String, value: String },

    #[error("question {question} has min {min} greater than max {max}")]
    InvalidRange { question: String, min: i64, max: i64 },

    #[error("{context}: unknown question id {id}")]
    UnknownQuestion { context: String, id: String },

    #[error("{context}: question {id} is declared later; dependencies may only reference earlier questions")]
    ForwardReference { context: String, id: String },

    #[error("{context}: unknown scope item {id}")]
    UnknownScopeItem { context: String, id: String },

    #[error("{context}: unknown category {id}")]
    UnknownCategory { context: String, id: String },

    #[error("{context}: unknown control id {id}")]
    UnknownControl { context: String, id: String },

    #[error("{context}: in_scope is not allowed here")]
    ScopeReferenceNotAllowed { context: String },

    #[error("{context}: {operator} does not apply to {answer_type} question {question}")]
    OperatorMismatch {
        context: String,
        question: String,
        operator: &'static str,
        answer_type: &'static str,
    },

    #[error("{context}: {value:?} is not an allowed value of question {question}")]
    ValueNotAllowed {
        context: String,
        question: String,
        value: String,
    },

    #[error("{context}: empty {combinator} list")]
    EmptyCombinator {
        context: String,
        combinator: &'static str,
    },

    #[error(
        "boundary thresholds must be at least 1 (moderate_min_items={moderate_min_items}, extensive_min_categories={extensive_min_categories})"
    )]
    InvalidThresholds {
        moderate_min_items: usize,
        extensive_min_categories: usize,
    },
}
