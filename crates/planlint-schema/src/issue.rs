//! Validation issues and results
//!
//! Every issue carries a JSON Pointer to the offending location in the
//! validated document. Issues keep the order in which the validator
//! discovered them.

use crate::registry::SchemaId;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structural problem found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// JSON Pointer to the offending value (`""` is the document root)
    pub path: String,
    /// Human-readable description
    pub message: String,
    /// Schema keyword that rejected the value (`required`, `type`, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keyword: String,
}

impl SchemaIssue {
    /// Create issue at a pointer path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            keyword: String::new(),
        }
    }

    /// With schema keyword
    #[inline]
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub(crate) fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        let keyword = schema_path.rsplit('/').next().unwrap_or_default();

        let message = match &error.kind {
            ValidationErrorKind::Required { property } => {
                format!("missing required property '{}'", display_key(property))
            }
            ValidationErrorKind::Enum { options } => {
                format!("value not allowed, must be one of {options}")
            }
            ValidationErrorKind::Type {
                kind: TypeKind::Single(expected),
            } => format!("wrong type, expected {expected}"),
            ValidationErrorKind::Type {
                kind: TypeKind::Multiple(expected),
            } => {
                let names: Vec<String> = expected.into_iter().map(|t| t.to_string()).collect();
                format!("wrong type, expected one of {}", names.join(", "))
            }
            _ => error.to_string(),
        };

        Self::new(error.instance_path.to_string(), message).with_keyword(keyword)
    }

    /// Render the pointer as a dotted path for people
    ///
    /// `/acquisition/channels/0/exposure_ms` becomes
    /// `acquisition.channels[0].exposure_ms`; the root becomes `(root)`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        let mut out = String::new();
        for segment in self.path.split('/').skip(1) {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            if !out.is_empty() && segment.parse::<usize>().is_ok() {
                out.push('[');
                out.push_str(&segment);
                out.push(']');
            } else {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&segment);
            }
        }
        if out.is_empty() {
            "(root)".to_string()
        } else {
            out
        }
    }
}

impl std::fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.dotted_path(), self.message)
    }
}

fn display_key(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

/// Outcome of validating one document against one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Schema the document was checked against
    pub schema: SchemaId,
    /// True when no issues were found
    pub valid: bool,
    /// Issues in discovery order
    pub errors: Vec<SchemaIssue>,
}

impl ValidationResult {
    /// Build result from collected issues
    #[must_use]
    pub fn from_issues(schema: SchemaId, errors: Vec<SchemaIssue>) -> Self {
        Self {
            schema,
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Check whether the document passed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Convert into a `Result`, keeping the issues on failure
    ///
    /// # Errors
    /// Returns the issue list if the document was invalid
    pub fn into_result(self) -> Result<(), Vec<SchemaIssue>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_path_nested_index() {
        let issue = SchemaIssue::new("/acquisition/channels/0/exposure_ms", "too small");
        assert_eq!(issue.dotted_path(), "acquisition.channels[0].exposure_ms");
    }

    #[test]
    fn dotted_path_root() {
        let issue = SchemaIssue::new("", "missing required property 'steps'");
        assert_eq!(issue.dotted_path(), "(root)");
    }

    #[test]
    fn dotted_path_unescapes_pointer() {
        let issue = SchemaIssue::new("/steps/2/parameters/a~1b", "bad");
        assert_eq!(issue.dotted_path(), "steps[2].parameters.a/b");
    }

    #[test]
    fn display_joins_path_and_message() {
        let issue = SchemaIssue::new("/steps/0", "missing required property 'action'");
        assert_eq!(
            issue.to_string(),
            "steps[0]: missing required property 'action'"
        );
    }

    fn issues_for(schema: &Value, instance: &Value) -> Vec<SchemaIssue> {
        let compiled = jsonschema::JSONSchema::compile(schema).unwrap();
        let issues = match compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| SchemaIssue::from_error(&e)).collect(),
        };
        issues
    }

    #[test]
    fn type_error_names_expected_type() {
        let schema = serde_json::json!({"properties": {"n": {"type": "integer"}}});
        let issues = issues_for(&schema, &serde_json::json!({"n": "three"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].keyword, "type");
        assert_eq!(issues[0].to_string(), "n: wrong type, expected integer");
    }

    #[test]
    fn type_error_lists_every_allowed_type() {
        let schema = serde_json::json!({"properties": {"c": {"type": ["string", "null"]}}});
        let issues = issues_for(&schema, &serde_json::json!({"c": 5}));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("wrong type, expected one of "));
        assert!(issues[0].message.contains("string"));
        assert!(issues[0].message.contains("null"));
    }

    #[test]
    fn result_from_no_issues_is_valid() {
        let result = ValidationResult::from_issues(SchemaId::ProcedureIr, Vec::new());
        assert!(result.is_valid());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn result_keeps_issue_order() {
        let issues = vec![SchemaIssue::new("/a", "first"), SchemaIssue::new("/b", "second")];
        let result = ValidationResult::from_issues(SchemaId::ExperimentPlan, issues.clone());
        assert!(!result.is_valid());
        assert_eq!(result.into_result().unwrap_err(), issues);
    }
}
