//! Result processor
//!
//! Normalizes both sides of a validation result envelope. Each side's root
//! node keeps all of its fields; only its `errors` list is replaced with the
//! flattened failures.

use crate::error::{Error, Result};
use crate::json;
use crate::node::{json_kind, ErrorTree, NodeError};
use crate::serializer::serialize_tree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Which side of an exchange a failure was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationResultSource {
    Request,
    Response,
}

impl fmt::Display for ValidationResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResultSource::Request => write!(f, "request"),
            ValidationResultSource::Response => write!(f, "response"),
        }
    }
}

/// Envelope holding the request-side and response-side error trees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub request_validation_result: NodeError,
    pub response_validation_result: NodeError,

    /// Other envelope fields, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationResult {
    pub fn new(request: NodeError, response: NodeError) -> Self {
        Self {
            request_validation_result: request,
            response_validation_result: response,
            extra: Map::new(),
        }
    }

    /// Root node for one side
    pub fn side(&self, source: ValidationResultSource) -> &NodeError {
        match source {
            ValidationResultSource::Request => &self.request_validation_result,
            ValidationResultSource::Response => &self.response_validation_result,
        }
    }

    /// Parse an envelope from a JSON document
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = json::from_str(input)?;
        Self::from_value(value)
    }

    /// Parse an envelope from an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = &value else {
            return Err(Error::invalid_input(format!(
                "validation result must be a JSON object, found {}",
                json_kind(&value)
            )));
        };
        for key in ["requestValidationResult", "responseValidationResult"] {
            if !map.get(key).is_some_and(Value::is_object) {
                return Err(Error::invalid_input(format!("missing or non-object '{key}'"))
                    .with_context("validation result envelope"));
            }
        }
        json::from_value(value)
    }
}

/// Normalize both sides of a validation result
///
/// The input is left untouched; a new envelope is returned.
pub fn process_validation_errors(result: &ValidationResult) -> ValidationResult {
    ValidationResult {
        request_validation_result: normalize_side(
            &result.request_validation_result,
            ValidationResultSource::Request,
        ),
        response_validation_result: normalize_side(
            &result.response_validation_result,
            ValidationResultSource::Response,
        ),
        extra: result.extra.clone(),
    }
}

/// Flattened failures for one side's root node
///
/// A root without children and without a code is an envelope for a clean
/// payload, not a failure, and yields nothing.
pub fn flatten_side(root: &NodeError) -> Vec<NodeError> {
    if root.is_leaf() && root.fields.code.is_none() {
        return Vec::new();
    }
    serialize_tree(&ErrorTree::from_node(root), &[])
}

fn normalize_side(root: &NodeError, source: ValidationResultSource) -> NodeError {
    let flattened = flatten_side(root);
    debug!(side = %source, errors = flattened.len(), "Normalized validation errors");
    NodeError {
        fields: root.fields.clone(),
        errors: Some(flattened),
        inner: root.inner.clone(),
    }
}
