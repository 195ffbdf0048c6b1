//! Error-tree node model
//!
//! [`NodeError`] is the JSON shape the upstream validator produces and the
//! shape the normalized output is written back in. [`ErrorTree`] is the same
//! data after ingestion, classified once into leaf, branch and discriminator
//! nodes so the serializer never has to re-inspect optional fields.
//!
//! Both types nest once per schema level. Copying and dropping them walks an
//! explicit stack instead of recursing, so depth is bounded by memory only.

use crate::error::{Error, Result};
use crate::json;
use crate::severity::codes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Location of a path: either already joined or still a list of segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPath {
    /// Finalized `/`-joined path
    Joined(String),
    /// Path segments relative to the parent scope
    Segments(#[serde(deserialize_with = "deserialize_segments")] Vec<String>),
}

impl ErrorPath {
    /// The path as a segment list; a joined path counts as one segment
    pub fn segments(&self) -> Vec<String> {
        match self {
            ErrorPath::Joined(path) => vec![path.clone()],
            ErrorPath::Segments(segments) => segments.clone(),
        }
    }

    /// The path as a single `/`-joined string
    pub fn to_joined(&self) -> String {
        match self {
            ErrorPath::Joined(path) => path.clone(),
            ErrorPath::Segments(segments) => segments.join("/"),
        }
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_joined())
    }
}

impl From<&str> for ErrorPath {
    fn from(path: &str) -> Self {
        ErrorPath::Joined(path.to_string())
    }
}

impl From<Vec<String>> for ErrorPath {
    fn from(segments: Vec<String>) -> Self {
        ErrorPath::Segments(segments)
    }
}

// Validators emit array indices as numbers in some paths.
fn deserialize_segments<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|segment| match segment {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "path segment must be a string or number, found {other}"
            ))),
        })
        .collect()
}

/// Where a failing request parameter lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterLocation {
    Body,
    Query,
    Path,
    Header,
    FormData,
    Other(String),
}

impl ParameterLocation {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterLocation::Body => "body",
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Other(other) => other,
        }
    }
}

impl From<String> for ParameterLocation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "body" => ParameterLocation::Body,
            "query" => ParameterLocation::Query,
            "path" => ParameterLocation::Path,
            "header" => ParameterLocation::Header,
            "formData" => ParameterLocation::FormData,
            _ => ParameterLocation::Other(value),
        }
    }
}

impl From<ParameterLocation> for String {
    fn from(location: ParameterLocation) -> Self {
        location.as_str().to_string()
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every node carries regardless of its shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeFields {
    /// Validator error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable description from the validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Location of the failure relative to the parent scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ErrorPath>,

    /// Parameter location for request-parameter failures
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterLocation>,

    /// Parameter name, set together with `in`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Values attached to a schema-level error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,

    /// Anything else the validator attached; written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeFields {
    /// Create fields carrying just a code
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Whether the node carries the given code
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// First entry of `params`, if any
    pub fn first_param(&self) -> Option<&Value> {
        self.params.as_ref().and_then(|params| params.first())
    }

    /// Copy of these fields with the path replaced
    pub fn with_path(&self, path: Option<ErrorPath>) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}

/// Wire shape of a validator error node
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeError {
    #[serde(flatten)]
    pub fields: NodeFields,

    /// Sub-validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<NodeError>>,

    /// Per-alternative detail of a composition failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Vec<NodeError>>,
}

impl NodeError {
    /// A childless node with the given fields
    pub fn leaf(fields: NodeFields) -> Self {
        Self {
            fields,
            errors: None,
            inner: None,
        }
    }

    /// Whether the node has no child failures
    pub fn is_leaf(&self) -> bool {
        self.errors.as_ref().map_or(true, Vec::is_empty)
            && self.inner.as_ref().map_or(true, Vec::is_empty)
    }

    /// Error code, if any
    pub fn code(&self) -> Option<&str> {
        self.fields.code.as_deref()
    }

    /// Parse a node from a JSON document
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = json::from_str(input)?;
        Self::from_value(value)
    }

    /// Parse a node from an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_input(format!(
                "error node must be a JSON object, found {}",
                json_kind(&value)
            )));
        }
        json::from_value(value)
    }

    fn take_children(&mut self, pending: &mut Vec<NodeError>) {
        pending.extend(self.errors.take().into_iter().flatten());
        pending.extend(self.inner.take().into_iter().flatten());
    }
}

impl Clone for NodeError {
    fn clone(&self) -> Self {
        enum Frame<'a> {
            Enter(&'a NodeError),
            Build(&'a NodeError),
        }

        let mut frames = vec![Frame::Enter(self)];
        let mut built: Vec<NodeError> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(node) => {
                    frames.push(Frame::Build(node));
                    let errors = node.errors.as_deref().unwrap_or_default();
                    let inner = node.inner.as_deref().unwrap_or_default();
                    frames.extend(inner.iter().rev().map(Frame::Enter));
                    frames.extend(errors.iter().rev().map(Frame::Enter));
                }
                Frame::Build(node) => {
                    let inner_len = node.inner.as_ref().map_or(0, Vec::len);
                    let inner = built.split_off(built.len() - inner_len);
                    let errors_len = node.errors.as_ref().map_or(0, Vec::len);
                    let errors = built.split_off(built.len() - errors_len);
                    built.push(NodeError {
                        fields: node.fields.clone(),
                        // Absent and empty lists stay distinct.
                        errors: node.errors.as_ref().map(|_| errors),
                        inner: node.inner.as_ref().map(|_| inner),
                    });
                }
            }
        }

        built.pop().unwrap_or_default()
    }
}

impl Drop for NodeError {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An ingested error node, classified by shape
#[derive(Debug, PartialEq)]
pub enum ErrorTree {
    /// No child failures
    Leaf(NodeFields),
    /// Child failures to be flattened into the parent's list
    Branch {
        fields: NodeFields,
        errors: Vec<ErrorTree>,
        inner: Vec<ErrorTree>,
    },
    /// `ONE_OF_MISSING` with alternative detail; kept nested when serialized
    Discriminator {
        fields: NodeFields,
        errors: Vec<ErrorTree>,
        inner: Vec<ErrorTree>,
    },
}

impl ErrorTree {
    /// Classify a wire node and all of its descendants
    pub fn ingest(root: NodeError) -> Self {
        Self::from_node(&root)
    }

    /// Classify a borrowed wire node; only node fields are copied
    pub fn from_node(root: &NodeError) -> Self {
        enum Frame<'a> {
            Enter(&'a NodeError),
            Build {
                fields: &'a NodeFields,
                errors: usize,
                inner: usize,
            },
        }

        let mut frames = vec![Frame::Enter(root)];
        let mut built: Vec<ErrorTree> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(node) => {
                    let errors = node.errors.as_deref().unwrap_or_default();
                    let inner = node.inner.as_deref().unwrap_or_default();

                    if errors.is_empty() && inner.is_empty() {
                        built.push(ErrorTree::Leaf(node.fields.clone()));
                        continue;
                    }

                    frames.push(Frame::Build {
                        fields: &node.fields,
                        errors: errors.len(),
                        inner: inner.len(),
                    });
                    // Reversed so that `errors` are built first, in order, then `inner`.
                    frames.extend(inner.iter().rev().map(Frame::Enter));
                    frames.extend(errors.iter().rev().map(Frame::Enter));
                }
                Frame::Build {
                    fields,
                    errors,
                    inner,
                } => {
                    let inner_children = built.split_off(built.len() - inner);
                    let error_children = built.split_off(built.len() - errors);
                    built.push(ErrorTree::composite(
                        fields.clone(),
                        error_children,
                        inner_children,
                    ));
                }
            }
        }

        // The stack always reduces to exactly one tree.
        built.pop().unwrap_or_else(|| ErrorTree::Leaf(NodeFields::default()))
    }

    fn composite(fields: NodeFields, errors: Vec<ErrorTree>, inner: Vec<ErrorTree>) -> Self {
        if fields.has_code(codes::ONE_OF_MISSING) && !inner.is_empty() {
            ErrorTree::Discriminator {
                fields,
                errors,
                inner,
            }
        } else {
            ErrorTree::Branch {
                fields,
                errors,
                inner,
            }
        }
    }

    /// Parse and ingest a JSON document
    pub fn from_json_str(input: &str) -> Result<Self> {
        NodeError::from_json_str(input).map(Self::ingest)
    }

    /// Ingest an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        NodeError::from_value(value).map(Self::ingest)
    }

    /// The node's own fields
    pub fn fields(&self) -> &NodeFields {
        match self {
            ErrorTree::Leaf(fields) => fields,
            ErrorTree::Branch { fields, .. } | ErrorTree::Discriminator { fields, .. } => fields,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ErrorTree::Leaf(_))
    }

    pub fn is_discriminator(&self) -> bool {
        matches!(self, ErrorTree::Discriminator { .. })
    }

    fn take_children(&mut self, pending: &mut Vec<ErrorTree>) {
        if let ErrorTree::Branch { errors, inner, .. }
        | ErrorTree::Discriminator { errors, inner, .. } = self
        {
            pending.append(errors);
            pending.append(inner);
        }
    }
}

impl Drop for ErrorTree {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut tree) = pending.pop() {
            tree.take_children(&mut pending);
        }
    }
}

impl From<NodeError> for ErrorTree {
    fn from(node: NodeError) -> Self {
        ErrorTree::ingest(node)
    }
}

impl From<&NodeError> for ErrorTree {
    fn from(node: &NodeError) -> Self {
        ErrorTree::from_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_accepts_string_or_segments() {
        let node: NodeError = serde_json::from_value(json!({"path": "a/b"})).unwrap();
        assert_eq!(node.fields.path, Some(ErrorPath::Joined("a/b".to_string())));

        let node: NodeError =
            serde_json::from_value(json!({"path": ["items", 0, "name"]})).unwrap();
        assert_eq!(
            node.fields.path.as_ref().map(ErrorPath::segments),
            Some(vec!["items".to_string(), "0".to_string(), "name".to_string()])
        );
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let input = json!({
            "code": "PATTERN",
            "in": "query",
            "name": "api-version",
            "title": "#/definitions/Widget",
            "schemaPath": "#/properties/name",
            "errors": []
        });
        let node: NodeError = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(node.fields.location, Some(ParameterLocation::Query));
        assert_eq!(node.fields.extra.get("title"), Some(&json!("#/definitions/Widget")));
        assert_eq!(serde_json::to_value(&node).unwrap(), input);
    }

    #[test]
    fn test_parameter_location_round_trip() {
        for raw in ["body", "query", "path", "header", "formData", "cookie"] {
            let location = ParameterLocation::from(raw.to_string());
            assert_eq!(String::from(location), raw);
        }
    }

    #[test]
    fn test_leaf_detection_treats_empty_as_absent() {
        let node: NodeError = serde_json::from_value(json!({"code": "X", "errors": [], "inner": []})).unwrap();
        assert!(node.is_leaf());
        assert!(ErrorTree::ingest(node).is_leaf());
    }

    #[test]
    fn test_ingest_classifies_discriminator() {
        let tree = ErrorTree::from_value(json!({
            "code": "ONE_OF_MISSING",
            "inner": [{"code": "INVALID_TYPE"}]
        }))
        .unwrap();
        assert!(tree.is_discriminator());

        // ONE_OF_MISSING without alternatives is an ordinary branch or leaf
        let tree = ErrorTree::from_value(json!({
            "code": "ONE_OF_MISSING",
            "errors": [{"code": "INVALID_TYPE"}]
        }))
        .unwrap();
        assert!(matches!(tree, ErrorTree::Branch { .. }));
    }

    #[test]
    fn test_ingest_preserves_child_order() {
        let tree = ErrorTree::from_value(json!({
            "code": "ANY_OF_MISSING",
            "errors": [
                {"code": "A"},
                {"code": "B", "errors": [{"code": "B1"}, {"code": "B2"}]}
            ],
            "inner": [{"code": "C"}]
        }))
        .unwrap();

        let ErrorTree::Branch { errors, inner, .. } = &tree else {
            panic!("expected a branch");
        };
        let codes: Vec<_> = errors.iter().map(|t| t.fields().code.clone().unwrap()).collect();
        assert_eq!(codes, vec!["A", "B"]);
        assert_eq!(inner[0].fields().code.as_deref(), Some("C"));

        let ErrorTree::Branch { errors: nested, .. } = &errors[1] else {
            panic!("expected a nested branch");
        };
        assert_eq!(nested[0].fields().code.as_deref(), Some("B1"));
        assert_eq!(nested[1].fields().code.as_deref(), Some("B2"));
    }

    fn chain(depth: usize) -> NodeError {
        let mut node = NodeError::leaf(NodeFields::with_code("MIN_LENGTH"));
        for _ in 0..depth {
            node = NodeError {
                fields: NodeFields::with_code("ANY_OF_MISSING"),
                errors: Some(vec![node]),
                inner: None,
            };
        }
        node
    }

    #[test]
    fn test_ingest_deep_tree() {
        let node = chain(200_000);
        let tree = ErrorTree::from_node(&node);
        assert!(matches!(tree, ErrorTree::Branch { .. }));
        drop(tree);
        drop(node);
    }

    #[test]
    fn test_clone_deep_tree() {
        let node = chain(200_000);
        let copy = node.clone();
        assert_eq!(copy.code(), Some("ANY_OF_MISSING"));
        assert_eq!(copy.errors.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_clone_keeps_absent_and_empty_lists_apart() {
        let node: NodeError = serde_json::from_value(json!({
            "code": "ANY_OF_MISSING",
            "errors": [{"code": "A", "inner": []}, {"code": "B", "path": ["x"]}]
        }))
        .unwrap();
        let copy = node.clone();
        assert_eq!(copy, node);
        assert_eq!(copy.inner, None);
        let errors = copy.errors.as_ref().unwrap();
        assert_eq!(errors[0].inner, Some(Vec::new()));
        assert_eq!(errors[1].inner, None);
    }

    #[test]
    fn test_parse_deeply_nested_json() {
        let depth = 1_500;
        let mut input = String::new();
        for _ in 0..depth {
            input.push_str(r#"{"code":"ANY_OF_MISSING","errors":["#);
        }
        input.push_str(r#"{"code":"MIN_LENGTH"}"#);
        for _ in 0..depth {
            input.push_str("]}");
        }

        let node = NodeError::from_json_str(&input).unwrap();
        assert_eq!(node.code(), Some("ANY_OF_MISSING"));

        let tree = ErrorTree::from_json_str(&input).unwrap();
        assert!(matches!(tree, ErrorTree::Branch { .. }));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = NodeError::from_value(json!(["not", "a", "node"])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
