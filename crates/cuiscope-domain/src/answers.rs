use cuiscope_types::AnswerValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated answer to one question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: &str, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.to_string(),
            value,
        }
    }
}

/// Answers collected by one completed session, keyed by question id.
///
/// Contains exactly the questions whose dependencies held. There is no
/// public mutation API; the engine builds it and everything downstream reads
/// it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    /// Build an answer set directly. A later answer for the same question
    /// replaces an earlier one.
    pub fn from_answers(answers: impl IntoIterator<Item = Answer>) -> Self {
        let mut set = Self::default();
        for answer in answers {
            set.insert(answer);
        }
        set
    }

    pub(crate) fn insert(&mut self, answer: Answer) {
        self.0.insert(answer.question_id, answer.value);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Answers in question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_answer_replaces_earlier() {
        let set = AnswerSet::from_answers([
            Answer::new("q1", AnswerValue::Boolean(false)),
            Answer::new("q1", AnswerValue::Boolean(true)),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("q1"), Some(&AnswerValue::Boolean(true)));
    }

    #[test]
    fn serializes_as_plain_map() {
        let set = AnswerSet::from_answers([Answer::new("q1", AnswerValue::Number(3))]);
        let v = serde_json::to_value(&set).expect("serialize");
        assert_eq!(v, serde_json::json!({"q1": {"type": "number", "value": 3}}));
    }
}
