//! The planlint pipeline
//!
//! Wires the schema registry, the validating gate and the analyzer together
//! according to a [`PlanlintConfig`]. A [`Planlint`] holds only immutable
//! state and can be shared across threads.

use crate::config::{PlanlintConfig, RequirementsConfig, SchemaConfig};
use crate::error::PlanlintError;
use crate::extraction::parse_llm_response;
use crate::plan::{self, PlanValidation};
use planlint_analysis::{Analyzer, CompletenessReport, TextOptions};
use planlint_ir::{Procedure, ProcedureValidator, ValidationError};
use planlint_requirements::{RequirementsError, RequirementsTable};
use planlint_schema::{SchemaError, SchemaId, SchemaRegistry};
use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;

fn load_registry(config: &SchemaConfig) -> Result<Arc<SchemaRegistry>, SchemaError> {
    if config.is_embedded() {
        return SchemaRegistry::shared();
    }

    let mut builder = SchemaRegistry::builder();
    if let Some(dir) = &config.dir {
        for id in SchemaId::ALL {
            builder = builder.with_file(id, dir.join(id.file_name()));
        }
    }
    if let Some(path) = &config.experiment_plan {
        builder = builder.with_file(SchemaId::ExperimentPlan, path);
    }
    if let Some(path) = &config.procedure_ir {
        builder = builder.with_file(SchemaId::ProcedureIr, path);
    }
    builder.build().map(Arc::new)
}

fn load_table(config: &RequirementsConfig) -> Result<Arc<RequirementsTable>, RequirementsError> {
    if config.extra.is_empty() {
        return RequirementsTable::shared();
    }

    let mut table = RequirementsTable::builtin()?;
    for path in &config.extra {
        table = table.merge(RequirementsTable::from_toml_file(path)?);
    }
    Ok(Arc::new(table))
}

/// Validation and analysis pipeline
#[derive(Debug, Clone)]
pub struct Planlint {
    config: PlanlintConfig,
    validator: ProcedureValidator,
    analyzer: Analyzer,
}

impl Planlint {
    /// Build pipeline from configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or a schema or table
    /// source fails to load
    pub fn new(config: PlanlintConfig) -> Result<Self, PlanlintError> {
        config.validate()?;
        let registry = load_registry(&config.schemas)?;
        let table = load_table(&config.requirements)?;

        tracing::info!(
            actions = table.len(),
            requirements_version = table.version(),
            "planlint ready"
        );

        Ok(Self {
            config,
            validator: ProcedureValidator::new(registry),
            analyzer: Analyzer::new(table),
        })
    }

    /// Pipeline with embedded schemas and the builtin table
    ///
    /// # Errors
    /// Returns error if the embedded data fails to load
    pub fn with_defaults() -> Result<Self, PlanlintError> {
        Self::new(PlanlintConfig::default())
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlanlintConfig {
        &self.config
    }

    /// Schema registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        self.validator.registry()
    }

    /// Requirements table in use
    #[inline]
    #[must_use]
    pub fn table(&self) -> &Arc<RequirementsTable> {
        self.analyzer.table()
    }

    /// Text renderer options from the configuration
    #[inline]
    #[must_use]
    pub fn text_options(&self) -> TextOptions {
        self.config.text_options()
    }

    /// Run the validating gate only
    ///
    /// # Errors
    /// Returns the rejection if the document is not a valid procedure
    pub fn validate(&self, document: &Value) -> Result<Procedure, ValidationError> {
        self.validator.validate(document)
    }

    /// Analyze a validated procedure
    #[inline]
    #[must_use]
    pub fn analyze(&self, procedure: &Procedure) -> CompletenessReport {
        self.analyzer.analyze(procedure)
    }

    /// Validate then analyze
    ///
    /// # Errors
    /// Returns the rejection if the document is not a valid procedure
    pub fn check(&self, document: &Value) -> Result<CompletenessReport, ValidationError> {
        let procedure = self.validate(document)?;
        Ok(self.analyze(&procedure))
    }

    /// Check independent documents in parallel
    ///
    /// Results are in input order.
    #[must_use]
    pub fn check_many(
        &self,
        documents: &[Value],
    ) -> Vec<Result<CompletenessReport, ValidationError>> {
        documents.par_iter().map(|doc| self.check(doc)).collect()
    }

    /// Parse an extractor response, then validate and analyze it
    ///
    /// # Errors
    /// Returns error if the response is not a JSON object with steps, or
    /// the document is rejected by the gate
    pub fn check_response(&self, response: &str) -> Result<CompletenessReport, PlanlintError> {
        let document = parse_llm_response(response)?;
        Ok(self.check(&document)?)
    }

    /// Validate a microscopy experiment plan
    #[must_use]
    pub fn validate_plan(&self, plan: &Value) -> PlanValidation {
        plan::validate_plan(self.registry(), plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_uses_shared_state() {
        let a = Planlint::with_defaults().unwrap();
        let b = Planlint::with_defaults().unwrap();
        assert!(Arc::ptr_eq(a.registry(), b.registry()));
        assert!(Arc::ptr_eq(a.table(), b.table()));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = PlanlintConfig::new().with_text_width(0);
        assert!(matches!(
            Planlint::new(config),
            Err(PlanlintError::Config(_))
        ));
    }

    #[test]
    fn missing_schema_dir_rejected() {
        let config = PlanlintConfig::new().with_schema_dir("/nonexistent/schemas");
        assert!(matches!(
            Planlint::new(config),
            Err(PlanlintError::Schema(SchemaError::Io { .. }))
        ));
    }

    #[test]
    fn planlint_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Planlint>();
    }
}
