//! Experiment plan validation

use planlint_schema::{SchemaId, SchemaIssue, SchemaRegistry};
use serde::Serialize;
use serde_json::Value;

/// Outcome of validating a microscopy experiment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanValidation {
    /// True when the plan matches the schema
    pub valid: bool,
    /// Issues in discovery order
    pub errors: Vec<SchemaIssue>,
    /// Version the plan declares, or `"unknown"`
    pub schema_version: String,
}

/// Validate a plan against the `experiment_plan` schema
#[must_use]
pub fn validate_plan(registry: &SchemaRegistry, plan: &Value) -> PlanValidation {
    let result = registry.validate(plan, SchemaId::ExperimentPlan);
    let schema_version = plan
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        valid = result.valid,
        issues = result.errors.len(),
        version = %schema_version,
        "experiment plan validated"
    );

    PlanValidation {
        valid: result.valid,
        errors: result.errors,
        schema_version,
    }
}
