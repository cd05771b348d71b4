//! Testing utilities for the planlint workspace
//!
//! Fixture documents for the procedure gate and the analyzer, plus a
//! minimal valid experiment plan.

#![allow(missing_docs)]

use planlint_ir::{Procedure, ProcedureValidator};
use serde_json::{json, Map, Value};

/// Fully specified values for the seeded action types
pub const SEEDED_VALUES: &[(&str, &[(&str, &str)])] = &[
    (
        "fix",
        &[
            ("fixative", "4% PFA"),
            ("concentration_or_dilution", "4%"),
            ("duration_min", "15"),
        ],
    ),
    (
        "stain",
        &[
            ("reagent", "DAPI"),
            ("concentration_or_dilution", "1:1000"),
            ("duration_min", "10"),
            ("temperature", "RT"),
        ],
    ),
    (
        "image",
        &[
            ("microscope_or_instrument", "Zeiss LSM 880"),
            ("magnification_or_objective", "63x oil"),
            ("exposure_or_settings", "200 ms"),
        ],
    ),
    ("incubate", &[("duration_min", "30"), ("temperature", "37C")]),
    ("wash", &[("buffer", "PBS"), ("wash_steps", "3")]),
    ("centrifuge", &[("speed", "3000 rpm"), ("duration_min", "10")]),
];

fn seeded(action: &str) -> &'static [(&'static str, &'static str)] {
    SEEDED_VALUES
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, values)| *values)
        .unwrap_or_else(|| panic!("no fixture values for action '{action}'"))
}

/// Step with every required parameter of a seeded action filled in
pub fn complete_step(action: &str) -> Value {
    let params: Map<String, Value> = seeded(action)
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect();
    json!({
        "action": action,
        "text": format!("Complete {action} step."),
        "parameters": params,
    })
}

/// Step of a seeded action missing its first required parameter
pub fn incomplete_step(action: &str) -> Value {
    let params: Map<String, Value> = seeded(action)
        .iter()
        .skip(1)
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect();
    json!({
        "action": action,
        "text": format!("Incomplete {action} step."),
        "parameters": params,
    })
}

/// Wrap steps into a procedure document
pub fn procedure_doc(steps: Vec<Value>) -> Value {
    json!({ "schema_version": "procedure_ir_v0", "steps": steps })
}

/// Twelve steps: six complete, six each missing one required parameter
pub fn twelve_step_procedure() -> Value {
    let actions = ["fix", "stain", "image", "incubate", "wash", "centrifuge"];
    let mut steps = Vec::with_capacity(12);
    for action in actions {
        steps.push(complete_step(action));
        steps.push(incomplete_step(action));
    }
    procedure_doc(steps)
}

/// Stain step giving only the reagent
pub fn stain_reagent_only() -> Value {
    procedure_doc(vec![json!({
        "action": "stain",
        "text": "Nuclei were stained with DAPI.",
        "parameters": {"reagent": "DAPI"}
    })])
}

/// Incubate step with both required parameters
pub fn incubate_complete() -> Value {
    procedure_doc(vec![json!({
        "action": "incubate",
        "text": "Incubate 30 min at 37C.",
        "parameters": {"duration_min": 30, "temperature": "37C"}
    })])
}

/// Procedure without steps
pub fn empty_procedure() -> Value {
    procedure_doc(Vec::new())
}

/// Centrifuge step whose speed is blank
pub fn centrifuge_blank_speed() -> Value {
    procedure_doc(vec![json!({
        "action": "centrifuge",
        "text": "Centrifuge for 10 min.",
        "parameters": {"speed": "", "duration_min": 10}
    })])
}

/// Step with an action type no table models
pub fn unknown_action() -> Value {
    procedure_doc(vec![json!({
        "action": "unknown_xyz",
        "text": "Do something unusual.",
        "parameters": {"knob": 11}
    })])
}

/// Validate a fixture through the shared gate
///
/// # Panics
/// Panics if the fixture does not pass validation
pub fn validated(document: &Value) -> Procedure {
    ProcedureValidator::shared()
        .unwrap()
        .validate(document)
        .unwrap()
}

/// Smallest experiment plan that satisfies the microscopy schema
pub fn microscopy_plan() -> Value {
    json!({
        "schema_version": "microscopy_v0",
        "study": {
            "title": "Nuclear morphology under drug X",
            "objective": "Quantify nuclear area change",
            "assay_type": "confocal_microscopy"
        },
        "design": {
            "conditions": [{"id": "c1", "name": "vehicle"}, {"id": "c2", "name": "drug X"}],
            "replicates": {"biological_n": 3}
        },
        "samples": {
            "sample_type": "HeLa cells",
            "preparation": {"mounting": "ProLong Gold"},
            "fluorophores": [{"name": "DAPI", "target": "DNA"}]
        },
        "acquisition": {
            "microscope": {
                "modality": "confocal",
                "instrument_id": "LSM880",
                "objective": {"magnification_x": 63, "numerical_aperture": 1.4}
            },
            "channels": [
                {"name": "DAPI", "excitation_nm": 405, "emission_nm": 461, "exposure_ms": 50}
            ]
        },
        "outputs": {
            "raw_data": {"format": "ome_tiff", "storage_location": "/data/raw"},
            "naming": {"pattern": "{condition}_{replicate}_{field}"}
        }
    })
}

/// Extractor response wrapping a document in a json code fence
pub fn fenced_response(document: &Value) -> String {
    format!("```json\n{document}\n```")
}
