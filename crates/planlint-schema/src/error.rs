//! Error types for the schema registry
//!
//! Registry errors only occur while loading and compiling schema documents.
//! Validating a document never fails; invalid documents are reported through
//! [`ValidationResult`](crate::ValidationResult).

use crate::registry::SchemaId;
use std::path::PathBuf;

/// Errors while loading or compiling schema documents
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Schema file could not be read
    #[error("io error reading schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema document is not valid JSON
    #[error("schema {origin} is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Schema document is not a JSON object
    #[error("schema for '{0}' must be a JSON object")]
    NotAnObject(SchemaId),

    /// Schema document failed to compile
    #[error("schema for '{id}' failed to compile: {message}")]
    Compile { id: SchemaId, message: String },

    /// Identifier does not name a known schema
    #[error("unknown schema id: '{0}'")]
    UnknownSchemaId(String),
}

impl SchemaError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create parse error for a schema origin
    pub fn parse(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_display() {
        let err = SchemaError::UnknownSchemaId("lab_notes".to_string());
        assert_eq!(err.to_string(), "unknown schema id: 'lab_notes'");
    }

    #[test]
    fn compile_error_names_schema() {
        let err = SchemaError::Compile {
            id: SchemaId::ProcedureIr,
            message: "bad keyword".to_string(),
        };
        assert!(err.to_string().contains("procedure_ir"));
        assert!(err.to_string().contains("bad keyword"));
    }
}
