use crate::answers::AnswerSet;
use cuiscope_types::AnswerValue;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an answer set.
///
/// Identity fields, per answer in question-id order:
/// - question id
/// - answer kind
/// - value (list items in stored order)
pub fn answers_fingerprint(answers: &AnswerSet) -> String {
    let mut hasher = Sha256::new();
    for (id, value) in answers.iter() {
        let line = format!("{id}|{}|{}\n", value.kind(), canonical_value(value));
        hasher.update(line.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn canonical_value(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Boolean(b) => b.to_string(),
        AnswerValue::Number(n) => n.to_string(),
        // Escape separators so distinct values never collide.
        AnswerValue::Choice(s) | AnswerValue::Text(s) => escape(s),
        AnswerValue::Choices(items) => items
            .iter()
            .map(|s| escape(s))
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace('|', "\\|")
        .replace('\n', "\\n")
}
