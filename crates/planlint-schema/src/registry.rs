//! Schema registry
//!
//! Holds the compiled `experiment_plan` and `procedure_ir` schemas. A registry
//! is built once at startup and never mutated afterwards, so it can be shared
//! across threads without locking.

use crate::error::SchemaError;
use crate::issue::{SchemaIssue, ValidationResult};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a registered schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaId {
    /// Microscopy experiment plan (`experiment_plan_microscopy_v0`)
    ExperimentPlan,
    /// Procedure intermediate representation (`procedure_ir_v0`)
    ProcedureIr,
}

impl SchemaId {
    /// All registered schema ids
    pub const ALL: [SchemaId; 2] = [SchemaId::ExperimentPlan, SchemaId::ProcedureIr];

    /// Stable identifier string
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExperimentPlan => "experiment_plan",
            Self::ProcedureIr => "procedure_ir",
        }
    }

    /// File name of the schema document inside a schema directory
    #[inline]
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::ExperimentPlan => "experiment_plan_microscopy_v0.schema.json",
            Self::ProcedureIr => "procedure_ir_v0.schema.json",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            Self::ExperimentPlan => {
                include_str!("../schemas/experiment_plan_microscopy_v0.schema.json")
            }
            Self::ProcedureIr => include_str!("../schemas/procedure_ir_v0.schema.json"),
        }
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experiment_plan" | "experiment_plan_microscopy_v0" => Ok(Self::ExperimentPlan),
            "procedure_ir" | "procedure_ir_v0" => Ok(Self::ProcedureIr),
            other => Err(SchemaError::UnknownSchemaId(other.to_string())),
        }
    }
}

/// Where a schema document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Copy compiled into the crate
    Embedded,
    /// Loaded from a file
    File(PathBuf),
    /// Supplied as an in-memory document
    Inline,
}

impl std::fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline => f.write_str("inline"),
        }
    }
}

struct LoadedSchema {
    document: Value,
    compiled: JSONSchema,
    origin: SchemaOrigin,
}

impl LoadedSchema {
    fn compile(id: SchemaId, document: Value, origin: SchemaOrigin) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::NotAnObject(id));
        }

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| SchemaError::Compile {
                id,
                message: e.to_string(),
            })?;

        tracing::info!(schema = %id, origin = %origin, "loaded schema");

        Ok(Self {
            document,
            compiled,
            origin,
        })
    }
}

/// Compiled schemas keyed by [`SchemaId`]
///
/// Validation is pure given the loaded schemas: the same document always
/// produces the same issues in the same order.
pub struct SchemaRegistry {
    experiment_plan: LoadedSchema,
    procedure_ir: LoadedSchema,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("experiment_plan", &self.experiment_plan.origin)
            .field("procedure_ir", &self.procedure_ir.origin)
            .finish()
    }
}

static SHARED: OnceCell<Arc<SchemaRegistry>> = OnceCell::new();

impl SchemaRegistry {
    /// Build registry from the embedded schema documents
    ///
    /// # Errors
    /// Returns error if an embedded document fails to parse or compile
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::builder().build()
    }

    /// Process-wide registry built from the embedded documents
    ///
    /// Initialized on first use; later calls return the same instance.
    ///
    /// # Errors
    /// Returns error if the embedded documents fail to compile
    pub fn shared() -> Result<Arc<Self>, SchemaError> {
        SHARED
            .get_or_try_init(|| Self::builtin().map(Arc::new))
            .map(Arc::clone)
    }

    /// Load both schemas from a directory using their standard file names
    ///
    /// # Errors
    /// Returns error if either file is missing, unreadable or invalid
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let mut builder = Self::builder();
        for id in SchemaId::ALL {
            builder = builder.with_file(id, dir.join(id.file_name()));
        }
        builder.build()
    }

    /// Start a registry builder
    #[inline]
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    fn entry(&self, id: SchemaId) -> &LoadedSchema {
        match id {
            SchemaId::ExperimentPlan => &self.experiment_plan,
            SchemaId::ProcedureIr => &self.procedure_ir,
        }
    }

    /// Validate a document against a registered schema
    #[must_use]
    pub fn validate(&self, document: &Value, id: SchemaId) -> ValidationResult {
        let issues = match self.entry(id).compiled.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| SchemaIssue::from_error(&e)).collect(),
        };
        ValidationResult::from_issues(id, issues)
    }

    /// Quick validity check without collecting issues
    #[inline]
    #[must_use]
    pub fn is_valid(&self, document: &Value, id: SchemaId) -> bool {
        self.entry(id).compiled.is_valid(document)
    }

    /// Raw schema document
    #[inline]
    #[must_use]
    pub fn document(&self, id: SchemaId) -> &Value {
        &self.entry(id).document
    }

    /// Where the schema was loaded from
    #[inline]
    #[must_use]
    pub fn origin(&self, id: SchemaId) -> &SchemaOrigin {
        &self.entry(id).origin
    }

    /// Schema `title`, if declared
    #[must_use]
    pub fn title(&self, id: SchemaId) -> Option<&str> {
        self.document(id).get("title").and_then(Value::as_str)
    }
}

enum PendingSource {
    File(PathBuf),
    Document(Value),
}

/// Builder for [`SchemaRegistry`]
///
/// Schemas not given explicitly fall back to the embedded documents.
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    experiment_plan: Option<PendingSource>,
    procedure_ir: Option<PendingSource>,
}

impl SchemaRegistryBuilder {
    fn slot(&mut self, id: SchemaId) -> &mut Option<PendingSource> {
        match id {
            SchemaId::ExperimentPlan => &mut self.experiment_plan,
            SchemaId::ProcedureIr => &mut self.procedure_ir,
        }
    }

    /// Load schema from a file
    #[must_use]
    pub fn with_file(mut self, id: SchemaId, path: impl Into<PathBuf>) -> Self {
        *self.slot(id) = Some(PendingSource::File(path.into()));
        self
    }

    /// Use an in-memory schema document
    #[must_use]
    pub fn with_document(mut self, id: SchemaId, document: Value) -> Self {
        *self.slot(id) = Some(PendingSource::Document(document));
        self
    }

    /// Load and compile every schema
    ///
    /// # Errors
    /// Returns the first load or compile failure
    pub fn build(mut self) -> Result<SchemaRegistry, SchemaError> {
        let experiment_plan = load(SchemaId::ExperimentPlan, self.slot(SchemaId::ExperimentPlan).take())?;
        let procedure_ir = load(SchemaId::ProcedureIr, self.slot(SchemaId::ProcedureIr).take())?;
        Ok(SchemaRegistry {
            experiment_plan,
            procedure_ir,
        })
    }
}

fn load(id: SchemaId, source: Option<PendingSource>) -> Result<LoadedSchema, SchemaError> {
    match source {
        None => {
            let document = serde_json::from_str(id.embedded())
                .map_err(|e| SchemaError::parse(id.file_name(), e))?;
            LoadedSchema::compile(id, document, SchemaOrigin::Embedded)
        }
        Some(PendingSource::File(path)) => {
            let text = std::fs::read_to_string(&path).map_err(|e| SchemaError::io(&path, e))?;
            let document = serde_json::from_str(&text)
                .map_err(|e| SchemaError::parse(path.display().to_string(), e))?;
            LoadedSchema::compile(id, document, SchemaOrigin::File(path))
        }
        Some(PendingSource::Document(document)) => {
            LoadedSchema::compile(id, document, SchemaOrigin::Inline)
        }
    }
}

/// Validate a document against the process-wide registry
///
/// # Errors
/// Returns error only if the shared registry cannot be initialized
pub fn validate_against_schema(
    document: &Value,
    id: SchemaId,
) -> Result<ValidationResult, SchemaError> {
    Ok(SchemaRegistry::shared()?.validate(document, id))
}
