//! Completeness analysis
//!
//! A pure function of the procedure and the requirements table: the same
//! inputs always give the same report. Nothing here fails; unknown actions,
//! blank values and empty procedures all surface as report fields.

use crate::finding::CompletenessFinding;
use crate::report::CompletenessReport;
use planlint_ir::{Procedure, Step};
use planlint_requirements::{ActionRequirementSpec, Lookup, RequirementsError, RequirementsTable};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Analyze a procedure against a requirements table
#[must_use]
pub fn analyze(procedure: &Procedure, table: &RequirementsTable) -> CompletenessReport {
    let findings: Vec<CompletenessFinding> = procedure
        .steps()
        .iter()
        .map(|step| assess_step(step, table))
        .collect();

    let total_steps = findings.len();
    let complete_steps = findings.iter().filter(|f| f.is_complete).count();
    let report = CompletenessReport {
        total_steps,
        complete_steps,
        incomplete_steps: total_steps - complete_steps,
        overall_score: ratio(complete_steps, total_steps),
        no_content: total_steps == 0,
        unrecognized_steps: findings.iter().filter(|f| f.unrecognized_action).count(),
        total_missing_required: findings.iter().map(|f| f.missing_required.len()).sum(),
        total_missing_recommended: findings.iter().map(|f| f.missing_recommended.len()).sum(),
        findings,
        citation: procedure.citation().map(ToString::to_string),
        requirements_version: table.version().to_string(),
        procedure_digest: procedure.digest(),
    };

    tracing::debug!(
        steps = report.total_steps,
        complete = report.complete_steps,
        score = report.overall_score,
        "procedure analyzed"
    );
    report
}

/// Assess a single step
#[must_use]
pub fn assess_step(step: &Step, table: &RequirementsTable) -> CompletenessFinding {
    let parameters_provided = step.provided_names().map(ToString::to_string).collect();

    match table.get(step.action()) {
        Lookup::Found(spec) => assess_known(step, spec, parameters_provided),
        Lookup::NotFound => {
            tracing::debug!(step = %step.id(), action = step.action(), "unrecognized action");
            CompletenessFinding {
                step_id: step.id().to_string(),
                action: step.action().to_string(),
                text: step.text().to_string(),
                is_complete: true,
                unrecognized_action: true,
                missing_required: BTreeSet::new(),
                missing_recommended: BTreeSet::new(),
                parameters_provided,
                coverage: 1.0,
            }
        }
    }
}

fn assess_known(
    step: &Step,
    spec: &ActionRequirementSpec,
    parameters_provided: Vec<String>,
) -> CompletenessFinding {
    let missing = |names: &BTreeSet<String>| -> BTreeSet<String> {
        names.iter().filter(|n| !step.provides(n)).cloned().collect()
    };
    let missing_required = missing(spec.required());
    let missing_recommended = missing(spec.recommended());

    let required = spec.required().len();
    CompletenessFinding {
        step_id: step.id().to_string(),
        action: step.action().to_string(),
        text: step.text().to_string(),
        is_complete: missing_required.is_empty(),
        unrecognized_action: false,
        coverage: ratio(required - missing_required.len(), required),
        missing_required,
        missing_recommended,
        parameters_provided,
    }
}

/// `part / whole`, defined as 1.0 when `whole` is zero
#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}

/// Analyzer bound to a requirements table
#[derive(Debug, Clone)]
pub struct Analyzer {
    table: Arc<RequirementsTable>,
}

impl Analyzer {
    /// Create analyzer over a table
    #[inline]
    #[must_use]
    pub fn new(table: Arc<RequirementsTable>) -> Self {
        Self { table }
    }

    /// Analyzer over the process-wide builtin table
    ///
    /// # Errors
    /// Returns error if the builtin table is malformed
    pub fn shared() -> Result<Self, RequirementsError> {
        Ok(Self::new(RequirementsTable::shared()?))
    }

    /// Table in use
    #[inline]
    #[must_use]
    pub fn table(&self) -> &Arc<RequirementsTable> {
        &self.table
    }

    /// Analyze a procedure
    #[must_use]
    pub fn analyze(&self, procedure: &Procedure) -> CompletenessReport {
        analyze(procedure, &self.table)
    }
}
