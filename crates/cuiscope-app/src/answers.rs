//! Answer files (`cuiscope.answers.v1`): the replay and resume format.

use crate::report::{AssessmentReport, parse_report_json};
use anyhow::Context;
use cuiscope_types::{RawAnswer, SCHEMA_ANSWERS_V1, SCHEMA_ASSESSMENT_V1};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerFile {
    pub schema: String,
    /// Question id -> value. Values go through the same validation as
    /// interactive input.
    #[serde(default)]
    pub answers: BTreeMap<String, RawAnswer>,
}

impl Default for AnswerFile {
    fn default() -> Self {
        Self {
            schema: SCHEMA_ANSWERS_V1.to_string(),
            answers: BTreeMap::new(),
        }
    }
}

/// Parse an answer file, or extract the answers of a saved report.
///
/// Accepting reports lets a finished assessment be replayed or resumed
/// without a separate export step.
pub fn parse_answers_json(text: &str) -> anyhow::Result<AnswerFile> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse answers json")?;
    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match schema.as_str() {
        SCHEMA_ANSWERS_V1 => serde_json::from_value(value).context("parse answer file"),
        SCHEMA_ASSESSMENT_V1 => {
            let report = parse_report_json(text)?;
            Ok(export_answers(&report))
        }
        other => anyhow::bail!(
            "unknown answers schema: {other} (expected {SCHEMA_ANSWERS_V1} or {SCHEMA_ASSESSMENT_V1})"
        ),
    }
}

/// The answers of a saved report, as an answer file.
pub fn export_answers(report: &AssessmentReport) -> AnswerFile {
    AnswerFile {
        schema: SCHEMA_ANSWERS_V1.to_string(),
        answers: report
            .data
            .answers
            .iter()
            .map(|(id, value)| (id.to_string(), RawAnswer::from(value)))
            .collect(),
    }
}

pub fn serialize_answer_file(file: &AnswerFile) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(file).context("serialize answer file")?;
    data.push(b'\n');
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{serialize_report, tests::sample_report};

    #[test]
    fn parses_answer_file_values() {
        let file = parse_answers_json(
            r#"{
                "schema": "cuiscope.answers.v1",
                "answers": {
                    "si_01": "1–10",
                    "si_02": true,
                    "df_03": ["Law Enforcement Sensitive"],
                    "bd_08a": 42
                }
            }"#,
        )
        .expect("parse");
        assert_eq!(file.answers.len(), 4);
        assert_eq!(file.answers["si_02"], RawAnswer::Bool(true));
        assert_eq!(file.answers["bd_08a"], RawAnswer::Number(42));
        assert_eq!(
            file.answers["df_03"],
            RawAnswer::List(vec!["Law Enforcement Sensitive".into()])
        );
    }

    #[test]
    fn report_answers_can_be_exported_and_reparsed() {
        let report = sample_report();
        let exported = export_answers(&report);
        assert_eq!(exported.answers.len(), 3);
        assert_eq!(exported.answers["df_01"], RawAnswer::Bool(true));

        let text = String::from_utf8(serialize_report(&report).expect("json")).expect("utf8");
        assert_eq!(parse_answers_json(&text).expect("parse"), exported);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_answers_json(r#"{"schema":"x","answers":{}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown answers schema: x"));
    }
}
