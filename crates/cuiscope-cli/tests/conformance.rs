//! Conformance tests for cuiscope.
//!
//! These tests validate:
//! 1. Every control in the built-in catalog has an explanation
//! 2. Reports written by the binary validate against the generated schema
//! 3. Reports are deterministic once run metadata is normalized

use assert_cmd::Command;
use cuiscope_app::{AnswerFile, AssessmentReport};
use cuiscope_test_util::{VERSION_PLACEHOLDER, normalize_report_text};
use cuiscope_types::{explain, ids};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("cuiscope-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

#[allow(deprecated)]
fn write_report(dir: &Path, answers: &str, out: &str) -> String {
    Command::cargo_bin("cuiscope")
        .unwrap()
        .current_dir(dir)
        .args(["assess", "--answers"])
        .arg(fixtures_dir().join("answers").join(answers))
        .args(["--report-out", out])
        .assert()
        .success();
    std::fs::read_to_string(dir.join(out)).expect("read report")
}

fn validator_for<T: schemars::JsonSchema>() -> jsonschema::Validator {
    let schema = serde_json::to_value(schemars::schema_for!(T)).expect("schema json");
    jsonschema::validator_for(&schema).expect("schema compiles")
}

// =============================================================================
// Explanation Coverage Tests
// =============================================================================

#[test]
fn all_builtin_controls_have_explanations() {
    let catalog = cuiscope_settings::builtin_catalog().expect("built-in catalog");
    assert_eq!(catalog.id(), ids::BUILTIN_CATALOG_ID);

    for control in catalog.controls().controls() {
        let exp = explain::lookup_explanation(&control.id)
            .unwrap_or_else(|| panic!("control '{}' has no explanation", control.id));
        assert_eq!(exp.control_id, control.id);
        assert!(!exp.description.is_empty(), "{} has empty description", control.id);
        assert!(!exp.remediation.is_empty(), "{} has empty remediation", control.id);
        assert!(!exp.evidence.is_empty(), "{} lists no evidence", control.id);
    }
}

#[test]
fn registry_has_no_controls_missing_from_the_builtin_catalog() {
    let catalog = cuiscope_settings::builtin_catalog().expect("built-in catalog");
    for id in explain::all_control_ids() {
        assert!(
            catalog.controls().control(id).is_some(),
            "control '{id}' is explained but not in the built-in catalog"
        );
    }
}

// =============================================================================
// Schema Conformance
// =============================================================================

#[test]
fn written_reports_validate_against_report_schema() {
    let tmp = TempDir::new().unwrap();
    let validator = validator_for::<AssessmentReport>();

    for answers in ["all-no.json", "cui-gaps.json"] {
        let text = write_report(tmp.path(), answers, "report.json");
        let value: Value = serde_json::from_str(&text).expect("report json");
        let errors: Vec<String> = validator.iter_errors(&value).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "{answers}: {errors:#?}");
    }
}

#[test]
fn answer_fixtures_validate_against_answers_schema() {
    let validator = validator_for::<AnswerFile>();
    let dir = fixtures_dir().join("answers");

    let mut checked = 0;
    for entry in std::fs::read_dir(&dir).expect("read answers fixtures") {
        let path = entry.expect("entry").path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let text = std::fs::read_to_string(&path).expect("read fixture");
        let value: Value = serde_json::from_str(&text).expect("fixture json");
        assert!(validator.is_valid(&value), "{} is invalid", path.display());
        checked += 1;
    }
    assert!(checked >= 4, "expected answer fixtures in {}", dir.display());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn reports_are_identical_after_normalization() {
    let tmp = TempDir::new().unwrap();
    let first = write_report(tmp.path(), "cui-gaps.json", "first.json");
    let second = write_report(tmp.path(), "cui-gaps.json", "second.json");

    let first = normalize_report_text(&first).expect("first json");
    let second = normalize_report_text(&second).expect("second json");
    assert_eq!(first["tool"]["version"], VERSION_PLACEHOLDER);
    assert_eq!(first, second);
}
