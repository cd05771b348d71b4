//! Pipeline behaviour across configuration, parsing and analysis

use planlint_core::{Planlint, PlanlintConfig, PlanlintError};
use planlint_ir::ValidationError;
use planlint_test_utils as fixtures;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

fn planlint() -> Planlint {
    Planlint::with_defaults().unwrap()
}

#[test]
fn check_rejects_before_analysis() {
    let result = planlint().check(&json!({"steps": [{"parameters": {}}]}));
    match result {
        Err(ValidationError::Schema(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].dotted_path(), "steps[0]");
            assert_eq!(issues[0].message, "missing required property 'action'");
        }
        other => panic!("expected schema rejection, got {other:?}"),
    }
}

#[test]
fn check_many_preserves_order() {
    let documents = vec![
        fixtures::twelve_step_procedure(),
        json!({"steps": "not a list"}),
        fixtures::empty_procedure(),
        fixtures::incubate_complete(),
    ];

    let results = planlint().check_many(&documents);
    assert_eq!(results.len(), 4);

    assert_eq!(results[0].as_ref().unwrap().total_steps, 12);
    assert!(results[1].is_err());
    assert!(results[2].as_ref().unwrap().no_content);
    assert!(results[3].as_ref().unwrap().is_fully_complete());
}

#[test]
fn check_many_matches_sequential_check() {
    let planlint = planlint();
    let documents: Vec<_> = (0..20)
        .map(|i| {
            if i % 2 == 0 {
                fixtures::twelve_step_procedure()
            } else {
                fixtures::stain_reagent_only()
            }
        })
        .collect();

    let parallel = planlint.check_many(&documents);
    for (doc, result) in documents.iter().zip(parallel) {
        assert_eq!(result.unwrap(), planlint.check(doc).unwrap());
    }
}

#[test]
fn check_response_runs_whole_pipeline() {
    let response = fixtures::fenced_response(&fixtures::centrifuge_blank_speed());
    let report = planlint().check_response(&response).unwrap();
    assert!(report.findings[0].missing_required.contains("speed"));
}

#[test]
fn check_response_distinguishes_failures() {
    let planlint = planlint();

    let unparsable = planlint.check_response("no json here").unwrap_err();
    assert!(matches!(unparsable, PlanlintError::Extraction(_)));
    assert!(unparsable.is_rejection());

    let invalid = planlint
        .check_response("```json\n{\"steps\": [{\"action\": 3}]}\n```")
        .unwrap_err();
    assert!(invalid.as_validation().is_some());
}

#[test]
fn empty_response_steps_are_no_content() {
    let report = planlint().check_response("{\"steps\": []}").unwrap();
    assert!(report.no_content);
    assert!((report.overall_score - 1.0).abs() < f64::EPSILON);
}

#[test]
fn validate_plan_reports_version_and_issues() {
    let planlint = planlint();

    let ok = planlint.validate_plan(&fixtures::microscopy_plan());
    assert!(ok.valid);
    assert_eq!(ok.schema_version, "microscopy_v0");

    let mut plan = fixtures::microscopy_plan();
    plan["acquisition"]["channels"][0]["exposure_ms"] = json!(-1);
    plan.as_object_mut().unwrap().remove("schema_version");
    let bad = planlint.validate_plan(&plan);
    assert!(!bad.valid);
    assert_eq!(bad.schema_version, "unknown");
    assert!(bad
        .errors
        .iter()
        .any(|e| e.message == "missing required property 'schema_version'"));
    assert!(bad
        .errors
        .iter()
        .any(|e| e.dotted_path() == "acquisition.channels[0].exposure_ms"));
}

#[test]
fn config_file_extends_requirements() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lab.toml"),
        r#"
version = "lab-1"

[actions.sonicate]
description = "Ultrasonic disruption"
required = ["amplitude", "duration_min"]
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("planlint.toml"),
        r#"
[requirements]
extra = ["lab.toml"]

[report]
attention_limit = 2
"#,
    )
    .unwrap();

    let config = PlanlintConfig::from_file(dir.path().join("planlint.toml")).unwrap();
    let planlint = Planlint::new(config).unwrap();

    assert_eq!(planlint.table().version(), "1+lab-1");
    assert_eq!(planlint.text_options().attention_limit, 2);

    let report = planlint
        .check(&json!({"steps": [{"action": "sonicate", "parameters": {"amplitude": "40%"}}]}))
        .unwrap();
    assert!(!report.findings[0].unrecognized_action);
    assert!(report.findings[0].missing_required.contains("duration_min"));
    assert_eq!(report.requirements_version, "1+lab-1");
}

#[test]
fn config_schema_dir_loads_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = planlint().registry().clone();
    for id in planlint_schema::SchemaId::ALL {
        fs::write(
            dir.path().join(id.file_name()),
            serde_json::to_string(registry.document(id)).unwrap(),
        )
        .unwrap();
    }

    let config = PlanlintConfig::new().with_schema_dir(dir.path());
    let planlint = Planlint::new(config).unwrap();
    assert!(matches!(
        planlint.registry().origin(planlint_schema::SchemaId::ProcedureIr),
        planlint_schema::SchemaOrigin::File(_)
    ));
    assert!(planlint.check(&fixtures::incubate_complete()).is_ok());
}

#[test]
fn missing_config_file_is_io_error() {
    assert!(matches!(
        PlanlintConfig::from_file("/nonexistent/planlint.toml"),
        Err(planlint_core::ConfigError::Io { .. })
    ));
}
