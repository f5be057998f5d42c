//! End-to-end tests for the cuiscope binary: batch assessment, resume,
//! rendering and catalog commands.

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn cuiscope_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cuiscope").unwrap();
    cmd.current_dir(dir).env_remove("CUISCOPE_LOG");
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("cuiscope-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

fn answers_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("answers").join(name)
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("parse json")
}

fn assess_batch(dir: &TempDir, answers: &str) -> assert_cmd::assert::Assert {
    cuiscope_cmd(dir.path())
        .args(["assess", "--answers"])
        .arg(answers_fixture(answers))
        .args(["--report-out", "report.json"])
        .assert()
}

#[test]
fn all_no_answers_produce_minimal_report() {
    let tmp = TempDir::new().unwrap();
    assess_batch(&tmp, "all-no.json")
        .success()
        .stdout(contains("SCOPING ASSESSMENT RESULTS"))
        .stdout(contains("Boundary:              minimal"))
        .stdout(contains("CMMC level required:   Not required"));

    let report = read_json(&tmp.path().join("report.json"));
    assert_eq!(report["schema"], "cuiscope.assessment.v1");
    assert_eq!(report["tool"]["name"], "cuiscope");
    assert_eq!(report["data"]["scope"]["boundary"], "minimal");
    assert_eq!(report["data"]["summary"]["not_applicable"], 15);
    assert!(report["data"]["scope"].get("required_level").is_none());
}

#[test]
fn cui_answers_produce_gaps_and_advisories() {
    let tmp = TempDir::new().unwrap();
    assess_batch(&tmp, "cui-gaps.json")
        .success()
        .stdout(contains("Boundary:              extensive"))
        .stdout(contains("CMMC level required:   Level 2"))
        .stdout(contains("[GAP] IA.3.083"))
        .stdout(contains("Advisories:"));

    let report = read_json(&tmp.path().join("report.json"));
    let data = &report["data"];
    assert_eq!(data["scope"]["required_level"], 2);
    assert_eq!(data["summary"]["addressed"], 9);
    assert_eq!(data["summary"]["partially_addressed"], 1);
    assert_eq!(data["summary"]["not_addressed"], 5);

    let coverage = data["coverage"].as_array().expect("coverage array");
    assert_eq!(coverage.len(), 15);
    let mfa = coverage
        .iter()
        .find(|e| e["control_id"] == "IA.3.083")
        .expect("IA.3.083 entry");
    assert_eq!(mfa["status"], "not_addressed");

    let advisories: Vec<&str> = data["advisories"]
        .as_array()
        .expect("advisories")
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert_eq!(
        advisories,
        vec!["enclave_recommended", "scope_reduction_possible"]
    );
}

#[test]
fn incomplete_answers_exit_2_without_report() {
    let tmp = TempDir::new().unwrap();
    assess_batch(&tmp, "incomplete.json")
        .code(2)
        .stderr(contains("input ended before question si_03"));
    assert!(!tmp.path().join("report.json").exists());
}

#[test]
fn invalid_answer_exits_2() {
    let tmp = TempDir::new().unwrap();
    assess_batch(&tmp, "invalid.json")
        .code(2)
        .stderr(contains("si_02"));
}

#[test]
fn interactive_end_of_input_aborts_with_exit_3() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args([
            "assess",
            "--organization",
            "Acme Corp",
            "--assessor",
            "J. Doe",
            "--cage-code",
            "1ABC2",
            "--contract",
            "W912-XX",
        ])
        .write_stdin("1\n")
        .assert()
        .code(3)
        .stdout(contains("System & Asset Inventory"))
        .stderr(contains("session aborted at question si_02"));
}

#[test]
fn resume_replays_saved_answers_then_prompts() {
    let tmp = TempDir::new().unwrap();
    let saved = tmp.path().join("saved.json");
    std::fs::write(
        &saved,
        r#"{"schema":"cuiscope.answers.v1","answers":{"ws_cui":"maybe"}}"#,
    )
    .unwrap();

    cuiscope_cmd(tmp.path())
        .arg("--catalog")
        .arg(fixtures_dir().join("catalogs").join("cui-workstation.toml"))
        .args(["assess", "--organization", "Acme Corp", "--assessor", "J. Doe"])
        .args(["--cage-code", "1ABC2", "--contract", "W912-XX"])
        .arg("--resume")
        .arg(&saved)
        .args(["--report-out", "out/report.json"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Does any workstation process CUI?"));

    let report = read_json(&tmp.path().join("out").join("report.json"));
    assert_eq!(report["subject"]["organization"], "Acme Corp");
    assert_eq!(report["data"]["coverage"][0]["status"], "addressed");
}

#[test]
fn custom_catalog_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let catalog = fixtures_dir().join("catalogs").join("cui-workstation.toml");

    for (answers, included, status) in [
        ("workstation-yes.json", true, "addressed"),
        ("workstation-no.json", false, "not_applicable"),
    ] {
        cuiscope_cmd(tmp.path())
            .arg("--catalog")
            .arg(&catalog)
            .args(["assess", "--answers"])
            .arg(answers_fixture(answers))
            .args(["--report-out", "report.json"])
            .assert()
            .success();

        let report = read_json(&tmp.path().join("report.json"));
        let item = &report["data"]["scope"]["items"][0];
        assert_eq!(item["id"], "cui_workstation");
        assert_eq!(item["included"], included);
        assert_eq!(report["data"]["coverage"][0]["control_id"], "SC.3.177");
        assert_eq!(report["data"]["coverage"][0]["status"], status);
    }
}

#[test]
fn config_file_sets_catalog_and_subject() {
    let tmp = TempDir::new().unwrap();
    std::fs::copy(
        fixtures_dir().join("catalogs").join("cui-workstation.toml"),
        tmp.path().join("ws.toml"),
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("cuiscope.toml"),
        r#"
schema = "cuiscope.config.v1"
catalog = "ws.toml"

[subject]
organization = "Config Org"
"#,
    )
    .unwrap();

    cuiscope_cmd(tmp.path())
        .args(["assess", "--answers"])
        .arg(answers_fixture("workstation-yes.json"))
        .args(["--report-out", "report.json", "--organization", "Flag Org"])
        .assert()
        .success()
        .stdout(contains("Organization:          Flag Org"));

    let report = read_json(&tmp.path().join("report.json"));
    assert_eq!(report["data"]["catalog"]["id"], "cui-workstation");
    assert_eq!(report["subject"]["organization"], "Flag Org");
}

#[test]
fn unknown_profile_is_a_runtime_error() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args(["--profile", "strictest", "assess", "--answers"])
        .arg(answers_fixture("all-no.json"))
        .assert()
        .code(1)
        .stderr(contains("unknown profile: strictest"));
}

#[test]
fn report_renders_to_markdown_summary_and_answers() {
    let tmp = TempDir::new().unwrap();
    assess_batch(&tmp, "cui-gaps.json").success();

    cuiscope_cmd(tmp.path())
        .args(["md", "--report", "report.json", "--output", "md/report.md"])
        .assert()
        .success();
    let md = std::fs::read_to_string(tmp.path().join("md").join("report.md")).unwrap();
    assert!(md.starts_with("# CMMC scoping report"));
    assert!(md.contains("Boundary: **EXTENSIVE**"));
    assert!(md.contains("| Control | Family | Status | Based on | Notes |"));
    assert!(md.contains("| GAP | `ac_02`, `ac_04`, `cui_data` |"));

    cuiscope_cmd(tmp.path())
        .args(["summary", "--report", "report.json"])
        .assert()
        .success()
        .stdout(contains("Controls:              9 addressed, 1 partial, 5 gaps, 0 n/a"));

    cuiscope_cmd(tmp.path())
        .args(["answers", "--report", "report.json", "-o", "answers.json"])
        .assert()
        .success();
    let exported = read_json(&tmp.path().join("answers.json"));
    assert_eq!(exported["schema"], "cuiscope.answers.v1");
    assert_eq!(exported["answers"]["bd_08a"], -45);

    // The exported file replays to the same assessment.
    cuiscope_cmd(tmp.path())
        .args(["assess", "--answers", "answers.json", "--report-out", "again.json"])
        .assert()
        .success();
    let first = read_json(&tmp.path().join("report.json"));
    let again = read_json(&tmp.path().join("again.json"));
    assert_eq!(
        first["data"]["answers_fingerprint"],
        again["data"]["answers_fingerprint"]
    );
}

#[test]
fn write_markdown_alongside_report() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args(["assess", "--answers"])
        .arg(answers_fixture("all-no.json"))
        .args(["--report-out", "report.json", "--write-markdown"])
        .args(["--markdown-out", "report.md"])
        .assert()
        .success();
    let md = std::fs::read_to_string(tmp.path().join("report.md")).unwrap();
    assert!(md.contains("No items are in scope."));
}

#[test]
fn explain_known_and_unknown_controls() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args(["explain", "IA.3.083"])
        .assert()
        .success()
        .stdout(contains("Remediation"))
        .stdout(contains("Informed by"));

    cuiscope_cmd(tmp.path())
        .args(["explain", "XX.9.999"])
        .assert()
        .code(1)
        .stderr(contains("Unknown control: XX.9.999"))
        .stderr(contains("SC.3.177"));
}

#[test]
fn catalog_command_validates_and_lists() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args(["catalog", "--list"])
        .assert()
        .success()
        .stdout(contains("catalog cmmc-l2-scoping"))
        .stdout(contains("(built-in)"))
        .stdout(contains("[access_control]"));

    cuiscope_cmd(tmp.path())
        .args(["--profile", "lenient", "catalog"])
        .assert()
        .success()
        .stdout(contains("moderate >= 3 items, extensive >= 4 categories"));
}

#[test]
fn broken_catalog_is_rejected() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("broken.toml"),
        r#"
id = "broken"
version = "1"

[[modules]]
id = "m"
title = "M"

[[modules.questions]]
id = "q"
text = "Q?"
type = "boolean"
depends_on = { question = "later", is = true }
"#,
    )
    .unwrap();

    cuiscope_cmd(tmp.path())
        .args(["--catalog", "broken.toml", "catalog"])
        .assert()
        .code(1)
        .stderr(contains("load catalog").and(contains("later")));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let tmp = TempDir::new().unwrap();
    cuiscope_cmd(tmp.path())
        .args(["-v", "assess", "--answers"])
        .arg(answers_fixture("all-no.json"))
        .args(["--report-out", "report.json"])
        .assert()
        .success()
        .stderr(contains("session finished"))
        .stdout(contains("session finished").not());
}
