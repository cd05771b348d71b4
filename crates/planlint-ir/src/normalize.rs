//! Normalization shared by the validator and the builder
//!
//! Input steps arrive with optional ids and parameter lists that may repeat
//! names. Normalization rejects repeated pre-supplied ids first, then
//! repeated parameter names, then assigns `step_<n>` ids to the remaining
//! steps.

use crate::error::{DuplicateParameter, DuplicateStepId, ValidationError};
use crate::model::{Parameter, Procedure, Source, Step, StepId, SCHEMA_VERSION};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Step before normalization
#[derive(Debug, Clone, Default)]
pub(crate) struct StepInput {
    pub(crate) id: Option<String>,
    pub(crate) action: String,
    pub(crate) text: String,
    pub(crate) parameters: Vec<(String, Parameter)>,
    pub(crate) confidence: Option<f64>,
}

/// Procedure before normalization
#[derive(Debug, Clone, Default)]
pub(crate) struct ProcedureInput {
    pub(crate) citation: Option<String>,
    pub(crate) source: Option<Source>,
    pub(crate) extraction_metadata: Option<Map<String, Value>>,
    pub(crate) steps: Vec<StepInput>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn normalize(input: ProcedureInput) -> Result<Procedure, ValidationError> {
    let supplied: Vec<Option<String>> = input
        .steps
        .iter()
        .map(|s| non_blank(s.id.as_deref().map(str::trim).map(str::to_string)))
        .collect();

    check_unique_ids(&supplied)?;

    let mut steps_params = Vec::with_capacity(input.steps.len());
    let mut duplicate_params = Vec::new();
    for (position, step) in input.steps.iter().enumerate() {
        let mut params = IndexMap::with_capacity(step.parameters.len());
        for (name, parameter) in &step.parameters {
            let name = name.trim().to_string();
            if params.contains_key(&name) {
                duplicate_params.push(DuplicateParameter {
                    step: position,
                    name,
                });
            } else {
                params.insert(name, parameter.clone());
            }
        }
        steps_params.push(params);
    }
    if !duplicate_params.is_empty() {
        return Err(ValidationError::DuplicateParameters(duplicate_params));
    }

    let ids = assign_ids(supplied);

    let steps = input
        .steps
        .into_iter()
        .zip(ids)
        .zip(steps_params)
        .map(|((step, id), parameters)| Step {
            id,
            action: step.action.trim().to_lowercase(),
            text: step.text,
            parameters,
            confidence: step.confidence,
        })
        .collect();

    let citation = non_blank(input.citation)
        .or_else(|| non_blank(input.source.as_ref().and_then(|s| s.citation.clone())));

    Ok(Procedure {
        schema_version: SCHEMA_VERSION,
        citation,
        source: input.source,
        extraction_metadata: input.extraction_metadata,
        steps,
    })
}

fn check_unique_ids(supplied: &[Option<String>]) -> Result<(), ValidationError> {
    let mut seen: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (position, id) in supplied.iter().enumerate() {
        if let Some(id) = id {
            seen.entry(id.as_str()).or_default().push(position);
        }
    }

    let duplicates: Vec<DuplicateStepId> = seen
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(id, positions)| DuplicateStepId {
            id: id.to_string(),
            positions,
        })
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DuplicateStepIds(duplicates))
    }
}

/// Keep supplied ids and generate the rest
///
/// A generated `step_<n>` that collides with a taken id gets `_2`, `_3`, ...
/// appended until unique.
fn assign_ids(supplied: Vec<Option<String>>) -> Vec<StepId> {
    let mut taken: HashSet<String> = supplied.iter().flatten().cloned().collect();

    supplied
        .into_iter()
        .enumerate()
        .map(|(position, id)| match id {
            Some(id) => StepId::new(id),
            None => {
                let base = StepId::generated(position + 1).as_str().to_string();
                let mut candidate = base.clone();
                let mut suffix = 2;
                while taken.contains(&candidate) {
                    candidate = format!("{base}_{suffix}");
                    suffix += 1;
                }
                taken.insert(candidate.clone());
                StepId::new(candidate)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: Option<&str>, action: &str) -> StepInput {
        StepInput {
            id: id.map(ToString::to_string),
            action: action.to_string(),
            ..StepInput::default()
        }
    }

    fn ids(procedure: &Procedure) -> Vec<&str> {
        procedure.steps().iter().map(|s| s.id().as_str()).collect()
    }

    #[test]
    fn generates_positional_ids() {
        let input = ProcedureInput {
            steps: vec![step(None, "fix"), step(None, "wash")],
            ..ProcedureInput::default()
        };
        let procedure = normalize(input).unwrap();
        assert_eq!(ids(&procedure), vec!["step_1", "step_2"]);
    }

    #[test]
    fn generated_id_avoids_supplied_collision() {
        let input = ProcedureInput {
            steps: vec![step(Some("step_2"), "fix"), step(None, "wash")],
            ..ProcedureInput::default()
        };
        let procedure = normalize(input).unwrap();
        assert_eq!(ids(&procedure), vec!["step_2", "step_2_2"]);
    }

    #[test]
    fn blank_id_treated_as_absent() {
        let input = ProcedureInput {
            steps: vec![step(Some("   "), "fix"), step(Some(" s2 "), "wash")],
            ..ProcedureInput::default()
        };
        let procedure = normalize(input).unwrap();
        assert_eq!(ids(&procedure), vec!["step_1", "s2"]);
    }

    #[test]
    fn duplicate_supplied_ids_rejected() {
        let input = ProcedureInput {
            steps: vec![
                step(Some("a"), "fix"),
                step(Some("b"), "wash"),
                step(Some("a"), "image"),
            ],
            ..ProcedureInput::default()
        };
        match normalize(input) {
            Err(ValidationError::DuplicateStepIds(dups)) => {
                assert_eq!(dups.len(), 1);
                assert_eq!(dups[0].id, "a");
                assert_eq!(dups[0].positions, vec![0, 2]);
            }
            other => panic!("expected duplicate ids, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_parameter_names_rejected() {
        let mut s = step(None, "centrifuge");
        s.parameters = vec![
            ("speed".to_string(), Parameter::new(3000)),
            (" speed".to_string(), Parameter::new(4000)),
        ];
        let input = ProcedureInput {
            steps: vec![s],
            ..ProcedureInput::default()
        };
        assert!(matches!(
            normalize(input),
            Err(ValidationError::DuplicateParameters(d)) if d[0].name == "speed"
        ));
    }

    #[test]
    fn action_is_trimmed_and_lowercased() {
        let input = ProcedureInput {
            steps: vec![step(None, "  Stain ")],
            ..ProcedureInput::default()
        };
        let procedure = normalize(input).unwrap();
        assert_eq!(procedure.steps()[0].action(), "stain");
    }

    #[test]
    fn citation_falls_back_to_source() {
        let input = ProcedureInput {
            citation: Some(String::new()),
            source: Some(Source {
                citation: Some("Doe et al. 2021".to_string()),
                ..Source::default()
            }),
            ..ProcedureInput::default()
        };
        let procedure = normalize(input).unwrap();
        assert_eq!(procedure.citation(), Some("Doe et al. 2021"));
        assert!(procedure.is_empty());
    }
}
