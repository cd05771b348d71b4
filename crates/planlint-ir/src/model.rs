//! Procedure data model
//!
//! A [`Procedure`] only exists after passing the validating gate or the
//! [`ProcedureBuilder`](crate::ProcedureBuilder); both guarantee unique step
//! ids and unique parameter names per step. Nothing here is mutable after
//! construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Schema version every normalized procedure carries
pub const SCHEMA_VERSION: &str = "procedure_ir_v0";

/// Step identifier, unique within one procedure
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Create id from a string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id generated for the step at a 1-based position
    #[inline]
    #[must_use]
    pub fn generated(position: usize) -> Self {
        Self(format!("step_{position}"))
    }

    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar parameter value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit null
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Number, kept exactly as written
    Number(Number),
    /// Free text, possibly carrying a unit (`"37C"`)
    Text(String),
}

impl ParamValue {
    /// Check whether the value carries no information
    ///
    /// Null and empty or whitespace-only text are blank. Zero and `false`
    /// are values.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for ParamValue {
    /// Non-finite floats have no JSON form and become [`ParamValue::Null`]
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Parameter value with optional unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Stated value
    pub value: ParamValue,
    /// Unit, when given separately from the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Parameter {
    /// Create parameter without unit
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<ParamValue>) -> Self {
        Self {
            value: value.into(),
            unit: None,
        }
    }

    /// With unit
    #[inline]
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Check whether the parameter carries no information
    ///
    /// A unit without a value is still blank.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.is_blank()
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.unit {
            Some(unit) if !unit.trim().is_empty() => write!(f, "{} {unit}", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

/// One experimental action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub(crate) id: StepId,
    pub(crate) action: String,
    pub(crate) text: String,
    pub(crate) parameters: IndexMap<String, Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) confidence: Option<f64>,
}

impl Step {
    /// Unique id within the procedure
    #[inline]
    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    /// Normalized action type (trimmed, lower-case)
    #[inline]
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Source sentence(s) the step was extracted from
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parameters in document order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    /// Parameter by name
    #[inline]
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Check whether a parameter is present with a non-blank value
    #[must_use]
    pub fn provides(&self, name: &str) -> bool {
        self.parameters.get(name).is_some_and(|p| !p.is_blank())
    }

    /// Names of non-blank parameters, in document order
    pub fn provided_names(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|(_, p)| !p.is_blank())
            .map(|(name, _)| name.as_str())
    }

    /// Extractor confidence in [0, 1], if reported
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

/// Where the procedure text came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Kind of source (`paper`, `lab_notes`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Full source text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Citation of the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// Location of the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Section the text was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Normalized, validated procedure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    pub(crate) schema_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) citation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) extraction_metadata: Option<Map<String, Value>>,
    pub(crate) steps: Vec<Step>,
}

#[derive(Serialize)]
struct Canonical<'a> {
    schema_version: &'a str,
    citation: Option<&'a str>,
    steps: &'a [Step],
}

impl Procedure {
    /// Start a builder
    #[inline]
    #[must_use]
    pub fn builder() -> crate::builder::ProcedureBuilder {
        crate::builder::ProcedureBuilder::new()
    }

    /// Schema version (`procedure_ir_v0`)
    #[inline]
    #[must_use]
    pub fn schema_version(&self) -> &str {
        self.schema_version
    }

    /// Citation, falling back to the source citation
    #[inline]
    #[must_use]
    pub fn citation(&self) -> Option<&str> {
        self.citation.as_deref()
    }

    /// Source description, if supplied
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Extractor metadata, passed through untouched
    #[inline]
    #[must_use]
    pub fn extraction_metadata(&self) -> Option<&Map<String, Value>> {
        self.extraction_metadata.as_ref()
    }

    /// Steps in replication order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step by id
    #[must_use]
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id.as_str() == id)
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check for the no-content case
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// BLAKE3 hex digest of the canonical JSON form
    ///
    /// Covers the schema version, citation and steps. Source text and
    /// extractor metadata are excluded, so re-extracting the same procedure
    /// at a different time gives the same digest.
    #[must_use]
    pub fn digest(&self) -> String {
        let canonical = Canonical {
            schema_version: self.schema_version,
            citation: self.citation.as_deref(),
            steps: &self.steps,
        };
        let mut hasher = blake3::Hasher::new();
        if let Err(e) = serde_json::to_writer(&mut hasher, &canonical) {
            tracing::warn!(error = %e, "procedure digest serialization failed");
        }
        hasher.finalize().to_hex().to_string()
    }
}
