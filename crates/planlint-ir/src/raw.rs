//! Serde view of a schema-valid document
//!
//! These types mirror `procedure_ir_v0` loosely: the schema has already
//! rejected bad shapes, so decoding only has to pick the right variant.
//! Unknown step keys (`missing_required` hints and the like) are ignored.

use crate::model::{ParamValue, Parameter, Source};
use crate::normalize::{ProcedureInput, StepInput};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct RawProcedure {
    #[serde(default)]
    citation: Option<String>,
    #[serde(default)]
    source: Option<Source>,
    #[serde(default)]
    extraction_metadata: Option<Map<String, Value>>,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    id: Option<String>,
    action: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default)]
    parameters: Option<RawParameters>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawParameters {
    Map(IndexMap<String, RawValue>),
    List(Vec<RawEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Scalar(ParamValue),
    Detailed {
        value: ParamValue,
        #[serde(default)]
        unit: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    #[serde(default)]
    value: ParamValue,
    #[serde(default)]
    unit: Option<String>,
}

impl From<RawValue> for Parameter {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Scalar(value) => Parameter { value, unit: None },
            RawValue::Detailed { value, unit } => Parameter { value, unit },
        }
    }
}

impl From<RawParameters> for Vec<(String, Parameter)> {
    fn from(raw: RawParameters) -> Self {
        match raw {
            RawParameters::Map(map) => map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            RawParameters::List(entries) => entries
                .into_iter()
                .map(|e| {
                    (
                        e.name,
                        Parameter {
                            value: e.value,
                            unit: e.unit,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl From<RawStep> for StepInput {
    fn from(raw: RawStep) -> Self {
        Self {
            id: raw.id,
            action: raw.action,
            text: raw.text.or(raw.raw_text).unwrap_or_default(),
            parameters: raw.parameters.map(Into::into).unwrap_or_default(),
            confidence: raw.confidence,
        }
    }
}

impl From<RawProcedure> for ProcedureInput {
    fn from(raw: RawProcedure) -> Self {
        Self {
            citation: raw.citation,
            source: raw.source,
            extraction_metadata: raw.extraction_metadata,
            steps: raw.steps.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(doc: Value) -> ProcedureInput {
        serde_json::from_value::<RawProcedure>(doc).unwrap().into()
    }

    #[test]
    fn map_form_keeps_document_order() {
        let input = decode(json!({
            "steps": [{
                "action": "centrifuge",
                "parameters": {"speed": {"value": 3000, "unit": "rpm"}, "duration_min": 10}
            }]
        }));
        let params = &input.steps[0].parameters;
        assert_eq!(params[0].0, "speed");
        assert_eq!(params[0].1.unit.as_deref(), Some("rpm"));
        assert_eq!(params[1].0, "duration_min");
        assert_eq!(params[1].1.value, ParamValue::from(10));
    }

    #[test]
    fn list_form_decodes_entries() {
        let input = decode(json!({
            "steps": [{
                "action": "stain",
                "parameters": [
                    {"name": "reagent", "value": "DAPI"},
                    {"name": "temperature", "value": null, "unit": "C"},
                    {"name": "duration_min"}
                ]
            }]
        }));
        let params = &input.steps[0].parameters;
        assert_eq!(params.len(), 3);
        assert!(params[1].1.is_blank());
        assert!(params[2].1.is_blank());
    }

    #[test]
    fn text_wins_over_raw_text() {
        let input = decode(json!({
            "steps": [
                {"action": "wash", "text": "Wash twice", "raw_text": "wash 2x in PBS"},
                {"action": "wash", "raw_text": "wash 3x in PBS"}
            ]
        }));
        assert_eq!(input.steps[0].text, "Wash twice");
        assert_eq!(input.steps[1].text, "wash 3x in PBS");
    }

    #[test]
    fn extra_step_keys_ignored() {
        let input = decode(json!({
            "steps": [{"action": "fix", "missing_required": ["fixative"], "confidence": 0.4}]
        }));
        assert_eq!(input.steps[0].confidence, Some(0.4));
        assert!(input.steps[0].parameters.is_empty());
    }
}
