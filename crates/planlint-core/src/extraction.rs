//! Deterministic tail of the extraction step
//!
//! The extractor is an external collaborator that answers with free text.
//! This module only turns that answer into a candidate JSON document; the
//! validating gate decides whether it is a procedure.

use planlint_ir::SCHEMA_VERSION;
use serde_json::Value;

const PREVIEW_CHARS: usize = 200;

/// Extractor response could not be turned into a candidate document
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Response is not JSON
    #[error("response is not valid JSON: {source} (response starts with {preview:?})")]
    InvalidJson {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    /// Response JSON is not an object
    #[error("response is not a JSON object")]
    NotAnObject,

    /// Object has no `steps` field
    #[error("response has no 'steps' field")]
    MissingSteps,

    /// `steps` is not an array
    #[error("response field 'steps' must be an array")]
    StepsNotArray,
}

fn strip_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let body = if let Some((_, rest)) = trimmed.split_once("```json") {
        rest
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest
    } else {
        return trimmed;
    };
    body.split_once("```").map_or(body, |(inner, _)| inner).trim()
}

/// Parse an extractor response into a candidate procedure document
///
/// Strips a Markdown code fence if present and stamps `schema_version`.
/// An empty step list is accepted; it is the no-content outcome, not an
/// extraction failure.
///
/// # Errors
/// Returns error if the response is not a JSON object with a `steps` array
pub fn parse_llm_response(response: &str) -> Result<Value, ExtractionError> {
    let body = strip_fence(response);
    let mut document: Value =
        serde_json::from_str(body).map_err(|source| ExtractionError::InvalidJson {
            preview: response.trim().chars().take(PREVIEW_CHARS).collect(),
            source,
        })?;

    let object = document.as_object_mut().ok_or(ExtractionError::NotAnObject)?;
    match object.get("steps") {
        None => return Err(ExtractionError::MissingSteps),
        Some(steps) if !steps.is_array() => return Err(ExtractionError::StepsNotArray),
        Some(_) => {}
    }
    object.insert(
        "schema_version".to_string(),
        Value::String(SCHEMA_VERSION.to_string()),
    );

    tracing::debug!(bytes = response.len(), "parsed extractor response");
    Ok(document)
}
