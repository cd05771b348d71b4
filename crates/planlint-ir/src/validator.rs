//! The validating gate
//!
//! Untrusted extractor output becomes a [`Procedure`] here or nowhere:
//! schema check first, decode second, normalize last. Later stages rely on
//! the guarantees this gate establishes and never re-check document shape.

use crate::error::ValidationError;
use crate::model::Procedure;
use crate::normalize;
use crate::raw::RawProcedure;
use planlint_schema::{SchemaError, SchemaId, SchemaRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Validate and normalize a candidate procedure document
///
/// # Errors
/// - [`ValidationError::Schema`] if the document fails `procedure_ir`
///   validation; the issues are returned exactly as the registry reported them
/// - [`ValidationError::DuplicateStepIds`] if pre-supplied ids repeat
/// - [`ValidationError::DuplicateParameters`] if a step names a parameter twice
pub fn validate_procedure(
    registry: &SchemaRegistry,
    document: &Value,
) -> Result<Procedure, ValidationError> {
    let result = registry.validate(document, SchemaId::ProcedureIr);
    if !result.is_valid() {
        tracing::debug!(issues = result.errors.len(), "procedure rejected by schema");
        return Err(ValidationError::Schema(result.errors));
    }

    let raw: RawProcedure = serde_json::from_value(document.clone())?;
    let procedure = normalize::normalize(raw.into()).inspect_err(|e| {
        tracing::debug!(error = %e, "procedure rejected during normalization");
    })?;

    tracing::debug!(steps = procedure.len(), "procedure accepted");
    Ok(procedure)
}

/// Validator bound to a schema registry
#[derive(Debug, Clone)]
pub struct ProcedureValidator {
    registry: Arc<SchemaRegistry>,
}

impl ProcedureValidator {
    /// Create validator over a registry
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Validator over the process-wide registry
    ///
    /// # Errors
    /// Returns error if the embedded schemas fail to compile
    pub fn shared() -> Result<Self, SchemaError> {
        Ok(Self::new(SchemaRegistry::shared()?))
    }

    /// Registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Validate and normalize a candidate document
    ///
    /// # Errors
    /// See [`validate_procedure`]
    pub fn validate(&self, document: &Value) -> Result<Procedure, ValidationError> {
        validate_procedure(&self.registry, document)
    }
}
