//! Subcommands run end to end against temporary files

use planlint_cli::{cli, load_config, run, Outcome};
use planlint_test_utils as fixtures;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn invoke(args: &[&str]) -> (Outcome, String) {
    let mut argv = vec!["planlint"];
    argv.extend_from_slice(args);
    let matches = cli::command().try_get_matches_from(argv).unwrap();
    let config = load_config(&matches).unwrap();
    let mut out = Vec::new();
    let outcome = run(&matches, config, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn analyze_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "p.json", &fixtures::twelve_step_procedure());

    let (outcome, text) = invoke(&["analyze", arg(&path)]);
    assert_eq!(outcome, Outcome::Success);
    assert!(text.contains("Procedure Analysis Summary"));
    assert!(text.contains("Completeness:       50%"));
}

#[test]
fn analyze_fail_incomplete_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "p.json", &fixtures::stain_reagent_only());

    let (outcome, _) = invoke(&["analyze", arg(&path), "--fail-incomplete"]);
    assert_eq!(outcome, Outcome::Incomplete);
}

#[test]
fn analyze_json_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "p.json", &fixtures::incubate_complete());

    let (outcome, text) = invoke(&["analyze", arg(&path), "--format", "json"]);
    assert_eq!(outcome, Outcome::Success);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["report"]["complete_steps"], 1);
    assert!(value.get("errors").is_none());
}

#[test]
fn analyze_mixed_batch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_json(dir.path(), "good.json", &fixtures::incubate_complete());
    let bad = write_json(dir.path(), "bad.json", &serde_json::json!({"steps": [{}]}));
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();

    let (outcome, text) = invoke(&[
        "analyze",
        arg(&good),
        arg(&bad),
        arg(&broken),
        "--format",
        "json",
    ]);
    assert_eq!(outcome, Outcome::Rejected);

    let entries: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].get("report").is_some());
    assert_eq!(entries[1]["errors"][0]["path"], "/steps/0");
    assert_eq!(entries[2]["errors"][0]["keyword"], "parse");
}

#[test]
fn analyze_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "p.json", &fixtures::empty_procedure());
    let report = dir.path().join("report.txt");

    let (outcome, stdout) = invoke(&["analyze", arg(&path), "-o", arg(&report)]);
    assert_eq!(outcome, Outcome::Success);
    assert!(stdout.is_empty());
    assert!(fs::read_to_string(report).unwrap().contains("No content to assess"));
}

#[test]
fn analyze_response_from_fenced_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("response.txt");
    fs::write(&path, fixtures::fenced_response(&fixtures::centrifuge_blank_speed())).unwrap();

    let (outcome, text) = invoke(&["analyze-response", arg(&path), "--format", "json"]);
    assert_eq!(outcome, Outcome::Success);
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["findings"][0]["missing_required"][0], "speed");
}

#[test]
fn analyze_response_rejects_prose() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("response.txt");
    fs::write(&path, "Sorry, no procedure found.").unwrap();

    let (outcome, text) = invoke(&["analyze-response", arg(&path)]);
    assert_eq!(outcome, Outcome::Rejected);
    assert!(text.contains("Rejected with 1 issue(s)"));
}

#[test]
fn validate_reports_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let doc = serde_json::json!({
        "steps": [{"id": "a", "action": "fix"}, {"id": "a", "action": "wash"}]
    });
    let path = write_json(dir.path(), "dup.json", &doc);

    let (outcome, text) = invoke(&["validate", arg(&path)]);
    assert_eq!(outcome, Outcome::Rejected);
    assert!(text.contains("steps[1].id: duplicate step id 'a'"));
}

#[test]
fn validate_plan_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "plan.json", &fixtures::microscopy_plan());

    let (outcome, text) = invoke(&["validate-plan", arg(&path), "--format", "json"]);
    assert_eq!(outcome, Outcome::Success);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["valid"], true);
    assert_eq!(value["schema_version"], "microscopy_v0");
}

#[test]
fn actions_lists_table() {
    let (outcome, text) = invoke(&["actions"]);
    assert_eq!(outcome, Outcome::Success);
    assert!(text.contains("centrifuge: "));
    assert!(text.contains("  required:    duration_min, speed"));

    let (_, json) = invoke(&["actions", "--json"]);
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "1");
    assert_eq!(value["actions"].as_array().unwrap().len(), 25);
}

#[test]
fn report_schema_is_json() {
    let (outcome, text) = invoke(&["report-schema"]);
    assert_eq!(outcome, Outcome::Success);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["title"], "CompletenessReport");
}

#[test]
fn config_file_overrides_logging() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("planlint.toml");
    fs::write(&config, "[logging]\nlevel = \"warn\"\n").unwrap();

    let matches = cli::command()
        .try_get_matches_from(["planlint", "--config", arg(&config), "actions", "--log-json"])
        .unwrap();
    let loaded = load_config(&matches).unwrap();
    assert_eq!(loaded.logging.level, "warn");
    assert!(loaded.logging.json);
}
