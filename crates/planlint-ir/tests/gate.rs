//! End-to-end behaviour of the validating gate

use planlint_ir::{ParamValue, ProcedureValidator, ValidationError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;

fn validator() -> ProcedureValidator {
    ProcedureValidator::shared().unwrap()
}

#[test]
fn both_parameter_forms_normalize_identically() {
    let map_form = json!({
        "steps": [{
            "action": "centrifuge",
            "text": "Spin at 3000 rpm for 10 min.",
            "parameters": {"speed": {"value": 3000, "unit": "rpm"}, "duration_min": 10}
        }]
    });
    let list_form = json!({
        "steps": [{
            "action": "centrifuge",
            "text": "Spin at 3000 rpm for 10 min.",
            "parameters": [
                {"name": "speed", "value": 3000, "unit": "rpm"},
                {"name": "duration_min", "value": 10}
            ]
        }]
    });

    let a = validator().validate(&map_form).unwrap();
    let b = validator().validate(&list_form).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn list_form_duplicate_name_rejected() {
    let doc = json!({
        "steps": [
            {"action": "wash", "parameters": [{"name": "buffer", "value": "PBS"}]},
            {"action": "wash", "parameters": [
                {"name": "buffer", "value": "PBS"},
                {"name": "buffer", "value": "TBS"}
            ]}
        ]
    });
    match validator().validate(&doc) {
        Err(err @ ValidationError::DuplicateParameters(_)) => {
            let issues = err.issues();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].path, "/steps/1/parameters");
        }
        other => panic!("expected duplicate parameters, got {other:?}"),
    }
}

#[test]
fn duplicate_supplied_ids_rejected_not_overwritten() {
    let doc = json!({
        "steps": [
            {"id": "s1", "action": "fix"},
            {"id": "s1", "action": "wash"}
        ]
    });
    assert!(matches!(
        validator().validate(&doc),
        Err(ValidationError::DuplicateStepIds(_))
    ));
}

#[test]
fn schema_issues_returned_verbatim() {
    let doc = json!({"steps": [{"action": "stain", "confidence": 1.5}]});
    let registry = validator().registry().clone();
    let expected = registry
        .validate(&doc, planlint_schema::SchemaId::ProcedureIr)
        .errors;

    match validator().validate(&doc) {
        Err(ValidationError::Schema(issues)) => assert_eq!(issues, expected),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn source_and_metadata_carried() {
    let doc = json!({
        "schema_version": "procedure_ir_v0",
        "source": {"type": "paper", "citation": "Lee 2020", "section": "Methods"},
        "extraction_metadata": {"model": "any", "extracted_at": "2024-01-01"},
        "steps": [{"action": "mount", "parameters": {"mounting_medium": "ProLong Gold"}}]
    });
    let procedure = validator().validate(&doc).unwrap();

    assert_eq!(procedure.citation(), Some("Lee 2020"));
    assert_eq!(
        procedure.source().and_then(|s| s.section.as_deref()),
        Some("Methods")
    );
    assert!(procedure.extraction_metadata().is_some());
    assert_eq!(
        procedure.steps()[0].parameter("mounting_medium").unwrap().value,
        ParamValue::from("ProLong Gold")
    );
}

#[test]
fn digest_ignores_extraction_metadata() {
    let base = json!({"steps": [{"action": "fix", "parameters": {"fixative": "PFA"}}]});
    let mut stamped = base.clone();
    stamped["extraction_metadata"] = json!({"extracted_at": "2025-06-01T10:00:00Z"});

    let a = validator().validate(&base).unwrap();
    let b = validator().validate(&stamped).unwrap();
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.digest().len(), 64);
}

fn step_doc(id: Option<String>) -> Value {
    match id {
        Some(id) => json!({"id": id, "action": "wash"}),
        None => json!({"action": "wash"}),
    }
}

proptest! {
    #[test]
    fn accepted_procedures_have_unique_ids(
        ids in prop::collection::vec(
            prop::option::of(prop::sample::select(vec![
                "step_1", "step_2", "step_3", "step_2_2", "a", "b", " ",
            ])),
            0..12,
        )
    ) {
        let doc = json!({
            "steps": ids
                .iter()
                .map(|id| step_doc(id.map(ToString::to_string)))
                .collect::<Vec<_>>()
        });

        match validator().validate(&doc) {
            Ok(procedure) => {
                let unique: HashSet<&str> =
                    procedure.steps().iter().map(|s| s.id().as_str()).collect();
                prop_assert_eq!(unique.len(), procedure.len());
                prop_assert_eq!(procedure.len(), ids.len());
            }
            Err(ValidationError::DuplicateStepIds(dups)) => {
                prop_assert!(!dups.is_empty());
            }
            Err(other) => prop_assert!(false, "unexpected rejection: {other}"),
        }
    }
}
