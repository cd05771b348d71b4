//! Programmatic procedure construction
//!
//! Builds a [`Procedure`] without going through JSON. The result passes the
//! same normalization as validated documents, so builder-made procedures
//! obey the same id and parameter uniqueness rules.

use crate::error::ValidationError;
use crate::model::{ParamValue, Parameter, Procedure, Source};
use crate::normalize::{normalize, ProcedureInput, StepInput};

/// Builder for a single step
#[derive(Debug, Clone, Default)]
pub struct StepBuilder {
    input: StepInput,
}

impl StepBuilder {
    /// Start a step for an action type
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            input: StepInput {
                action: action.into(),
                ..StepInput::default()
            },
        }
    }

    /// With explicit id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.input.id = Some(id.into());
        self
    }

    /// With source text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.input.text = text.into();
        self
    }

    /// Add a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.input.parameters.push((name.into(), Parameter::new(value)));
        self
    }

    /// Add a parameter with unit
    #[must_use]
    pub fn param_with_unit(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
        unit: impl Into<String>,
    ) -> Self {
        self.input
            .parameters
            .push((name.into(), Parameter::new(value).with_unit(unit)));
        self
    }

    /// With extractor confidence
    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.input.confidence = Some(confidence);
        self
    }
}

/// Builder for a [`Procedure`]
#[derive(Debug, Clone, Default)]
pub struct ProcedureBuilder {
    input: ProcedureInput,
}

impl ProcedureBuilder {
    /// Create empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With citation
    #[must_use]
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.input.citation = Some(citation.into());
        self
    }

    /// With source description
    #[must_use]
    pub fn source(mut self, source: Source) -> Self {
        self.input.source = Some(source);
        self
    }

    /// Append a step
    #[must_use]
    pub fn step(mut self, step: StepBuilder) -> Self {
        self.input.steps.push(step.input);
        self
    }

    /// Append several steps
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = StepBuilder>) -> Self {
        self.input.steps.extend(steps.into_iter().map(|s| s.input));
        self
    }

    /// Normalize into a procedure
    ///
    /// # Errors
    /// Returns error on repeated step ids or repeated parameter names
    pub fn build(self) -> Result<Procedure, ValidationError> {
        normalize(self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_steps_in_order() {
        let procedure = Procedure::builder()
            .citation("Smith 2023")
            .step(StepBuilder::new("fix").param("fixative", "4% PFA"))
            .step(
                StepBuilder::new("centrifuge")
                    .param_with_unit("speed", 3000, "rpm")
                    .param("duration_min", 10),
            )
            .build()
            .unwrap();

        assert_eq!(procedure.citation(), Some("Smith 2023"));
        assert_eq!(procedure.steps()[1].id().as_str(), "step_2");
        assert_eq!(
            procedure.steps()[1].parameter("speed").unwrap().to_string(),
            "3000 rpm"
        );
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let result = Procedure::builder()
            .step(StepBuilder::new("fix").id("x"))
            .step(StepBuilder::new("wash").id("x"))
            .build();
        assert!(matches!(result, Err(ValidationError::DuplicateStepIds(_))));
    }
}
