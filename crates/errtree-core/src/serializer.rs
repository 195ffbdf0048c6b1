//! Error-tree serializer
//!
//! Flattens an ingested [`ErrorTree`] into the list of failures a report
//! shows. Along the way it:
//!
//! - rewrites request-parameter paths to their reportable form
//! - consolidates each level's path fragment into the accumulated path
//! - drops the spurious null-type mismatch produced by nullable-via-oneOf schemas
//! - keeps `ONE_OF_MISSING` discriminators as a single node holding their
//!   (flattened) alternatives
//!
//! Output nodes are built fresh; the input tree is never modified. Traversal
//! uses an explicit work stack so schema nesting depth cannot exhaust the
//! call stack.

use crate::node::{ErrorPath, ErrorTree, NodeError, NodeFields, ParameterLocation};
use crate::path::{consolidate_path, join_path};
use crate::severity::codes;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// Literal the validator places in `params[0]` for a type mismatch against null
const NULL_TYPE: &str = "null";

/// Schema-traversal root that marks a parameter path
const PATHS_ROOT: &str = "paths";

/// Flatten a wire-shape node
///
/// Convenience over [`serialize_tree`] for callers holding raw validator output.
pub fn serialize_errors(node: &NodeError, path: &[String]) -> Vec<NodeError> {
    serialize_tree(&ErrorTree::from_node(node), path)
}

/// Flatten an ingested tree, starting from an accumulated `path`
///
/// Every returned node has a finalized `/`-joined path (when it has a path at
/// all) and no `errors`/`inner` children, except discriminators, whose
/// `inner` holds their own flattened alternatives.
pub fn serialize_tree(tree: &ErrorTree, path: &[String]) -> Vec<NodeError> {
    enum Frame<'a> {
        Visit {
            tree: &'a ErrorTree,
            path: Rc<[String]>,
        },
        Collect {
            tree: &'a ErrorTree,
            path: Rc<[String]>,
            rewritten: Option<Vec<String>>,
            errors: usize,
            inner: usize,
        },
    }

    let mut frames = vec![Frame::Visit {
        tree,
        path: Rc::from(path),
    }];
    // One entry per visited subtree, in visiting order.
    let mut results: Vec<Vec<NodeError>> = Vec::new();

    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Visit { tree, path } => match tree {
                ErrorTree::Leaf(fields) => results.push(serialize_leaf(fields, &path)),
                ErrorTree::Branch {
                    fields,
                    errors,
                    inner,
                }
                | ErrorTree::Discriminator {
                    fields,
                    errors,
                    inner,
                } => {
                    let rewritten = rewrite_path(fields);
                    let child_path: Rc<[String]> = match &rewritten {
                        Some(segments) => Rc::from(consolidate_path(&path, segments.as_slice())),
                        None => path,
                    };

                    frames.push(Frame::Collect {
                        tree,
                        path: Rc::clone(&child_path),
                        rewritten,
                        errors: errors.len(),
                        inner: inner.len(),
                    });
                    // Reversed so that `errors` are visited first, in order, then `inner`.
                    for child in inner.iter().rev().chain(errors.iter().rev()) {
                        frames.push(Frame::Visit {
                            tree: child,
                            path: Rc::clone(&child_path),
                        });
                    }
                }
            },
            Frame::Collect {
                tree,
                path,
                rewritten,
                errors,
                inner,
            } => {
                let inner_results = drain_flat(&mut results, inner);
                let mut error_results = drain_flat(&mut results, errors);

                if let ErrorTree::Discriminator { fields, .. } = tree {
                    let path = rewritten.map(|segments| finalize(&path, &segments));
                    debug!(
                        code = fields.code.as_deref().unwrap_or_default(),
                        alternatives = inner_results.len(),
                        "Keeping discriminator nested"
                    );
                    results.push(vec![NodeError {
                        fields: fields.with_path(path),
                        errors: (!error_results.is_empty()).then_some(error_results),
                        inner: Some(inner_results),
                    }]);
                } else {
                    error_results.extend(inner_results);
                    results.push(error_results);
                }
            }
        }
    }

    let flattened: Vec<NodeError> = results.into_iter().flatten().collect();
    trace!(count = flattened.len(), "Serialized error tree");
    flattened
}

/// Whether a leaf is a genuine failure rather than a nullable-schema artifact
///
/// Validators that model `nullable` as a oneOf with a null branch report a
/// type mismatch against `"null"` for the non-null branch. Those are noise.
pub fn is_true_error(fields: &NodeFields) -> bool {
    !(fields.has_code(codes::INVALID_TYPE)
        && matches!(fields.first_param(), Some(Value::String(p)) if p == NULL_TYPE))
}

/// Apply the request-parameter path rewrites to a node's own path
///
/// Returns `None` when the node has no path, so the accumulated path passes
/// through untouched.
pub fn rewrite_path(fields: &NodeFields) -> Option<Vec<String>> {
    let segments = fields.path.as_ref()?.segments();

    // Body parameters are keyed by the whole-body schema: report at the root.
    if fields.has_code(codes::INVALID_REQUEST_PARAMETER)
        && fields.location == Some(ParameterLocation::Body)
    {
        return Some(Vec::new());
    }

    if matches!(
        fields.location,
        Some(ParameterLocation::Query | ParameterLocation::Path)
    ) && segments.first().map(String::as_str) == Some(PATHS_ROOT)
    {
        // URI template followed by the parameter name.
        if let (Some(template), Some(name)) = (
            segments.get(1),
            fields.name.as_deref().filter(|name| !name.is_empty()),
        ) {
            return Some(vec![template.clone(), name.to_string()]);
        }
    }

    Some(segments)
}

fn serialize_leaf(fields: &NodeFields, path: &[String]) -> Vec<NodeError> {
    if !is_true_error(fields) {
        trace!(
            code = fields.code.as_deref().unwrap_or_default(),
            "Dropping null-type artifact"
        );
        return Vec::new();
    }
    let path = rewrite_path(fields).map(|segments| finalize(path, &segments));
    vec![NodeError::leaf(fields.with_path(path))]
}

fn finalize(path: &[String], segments: &[String]) -> ErrorPath {
    ErrorPath::Joined(join_path(&consolidate_path(path, segments)))
}

fn drain_flat(results: &mut Vec<Vec<NodeError>>, count: usize) -> Vec<NodeError> {
    let start = results.len() - count;
    results.drain(start..).flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> NodeError {
        serde_json::from_value(value).unwrap()
    }

    fn joined(path: &str) -> Option<ErrorPath> {
        Some(ErrorPath::Joined(path.to_string()))
    }

    #[test]
    fn test_leaf_path_is_finalized() {
        let result = serialize_errors(
            &node(json!({"code": "MAX_LENGTH", "path": ["properties", "name"]})),
            &["root".to_string()],
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fields.path, joined("root/properties/name"));
        assert!(result[0].errors.is_none());
    }

    #[test]
    fn test_leaf_without_path_keeps_none() {
        let result = serialize_errors(&node(json!({"code": "MINIMUM"})), &["a".to_string()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fields.path, None);
    }

    #[test]
    fn test_null_type_artifact_is_filtered() {
        let artifact = node(json!({"code": "INVALID_TYPE", "params": ["null", "string"]}));
        assert!(serialize_errors(&artifact, &[]).is_empty());

        let real = node(json!({"code": "INVALID_TYPE", "params": ["string", "integer"]}));
        assert_eq!(serialize_errors(&real, &[]).len(), 1);

        // Only INVALID_TYPE is subject to the filter
        let other = node(json!({"code": "ENUM_MISMATCH", "params": ["null"]}));
        assert_eq!(serialize_errors(&other, &[]).len(), 1);
    }

    #[test]
    fn test_branch_is_flattened_in_order() {
        let tree = node(json!({
            "code": "ANY_OF_MISSING",
            "path": ["body"],
            "errors": [
                {"code": "MIN_LENGTH", "path": ["name"]},
                {"code": "OBJECT_MISSING_REQUIRED_PROPERTY", "errors": [
                    {"code": "PATTERN", "path": ["body", "id"]}
                ]}
            ],
            "inner": [{"code": "MAXIMUM", "path": ["count"]}]
        }));

        let result = serialize_errors(&tree, &[]);
        let summary: Vec<_> = result
            .iter()
            .map(|n| (n.code().unwrap(), n.fields.path.as_ref().unwrap().to_joined()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("MIN_LENGTH", "body/name".to_string()),
                ("PATTERN", "body/id".to_string()),
                ("MAXIMUM", "body/count".to_string()),
            ]
        );
    }

    #[test]
    fn test_discriminator_stays_nested() {
        let tree = node(json!({
            "code": "ONE_OF_MISSING",
            "path": ["pet"],
            "inner": [
                {"code": "INVALID_TYPE", "params": ["null"]},
                {"code": "OBJECT_MISSING_REQUIRED_PROPERTY", "path": ["pet", "name"]}
            ]
        }));

        let result = serialize_errors(&tree, &["body".to_string()]);
        assert_eq!(result.len(), 1);
        let discriminator = &result[0];
        assert_eq!(discriminator.code(), Some("ONE_OF_MISSING"));
        assert_eq!(discriminator.fields.path, joined("body/pet"));

        let inner = discriminator.inner.as_ref().unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].fields.path, joined("body/pet/name"));
    }

    #[test]
    fn test_discriminator_with_all_alternatives_filtered() {
        let tree = node(json!({
            "code": "ONE_OF_MISSING",
            "inner": [{"code": "INVALID_TYPE", "params": ["null"]}]
        }));
        let result = serialize_errors(&tree, &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].inner, Some(Vec::new()));
    }

    #[test]
    fn test_nested_discriminator_is_not_flattened_into_siblings() {
        let tree = node(json!({
            "code": "INVALID_RESPONSE_BODY",
            "errors": [
                {"code": "MIN_LENGTH", "path": ["a"]},
                {"code": "ONE_OF_MISSING", "path": ["b"], "inner": [
                    {"code": "PATTERN", "path": ["c"]},
                    {"code": "MAXIMUM", "path": ["d"]}
                ]}
            ]
        }));

        let result = serialize_errors(&tree, &[]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].code(), Some("ONE_OF_MISSING"));
        assert_eq!(result[1].inner.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_body_parameter_path_resets_to_root() {
        let tree = node(json!({
            "code": "INVALID_REQUEST_PARAMETER",
            "in": "body",
            "name": "widget",
            "path": ["paths", "/widgets", "put", "parameters", "0"],
            "errors": [{"code": "MAX_LENGTH", "path": ["name"]}]
        }));

        let result = serialize_errors(&tree, &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fields.path, joined("name"));
    }

    #[test]
    fn test_query_parameter_path_is_normalized() {
        let tree = node(json!({
            "code": "PATTERN",
            "in": "query",
            "name": "version",
            "path": ["paths", "/x", "get", "parameters", "0"]
        }));
        let result = serialize_errors(&tree, &[]);
        assert_eq!(result[0].fields.path, joined("/x/version"));
    }

    #[test]
    fn test_path_parameter_without_name_falls_through() {
        let tree = node(json!({
            "code": "PATTERN",
            "in": "path",
            "path": ["paths", "/x/{id}", "get"]
        }));
        let result = serialize_errors(&tree, &[]);
        assert_eq!(result[0].fields.path, joined("paths//x/{id}/get"));
    }

    #[test]
    fn test_header_parameter_is_not_rewritten() {
        let fields: NodeFields = serde_json::from_value(json!({
            "code": "PATTERN",
            "in": "header",
            "name": "x-ms-version",
            "path": ["paths", "/x", "get"]
        }))
        .unwrap();
        assert_eq!(
            rewrite_path(&fields),
            Some(vec!["paths".to_string(), "/x".to_string(), "get".to_string()])
        );
    }

    #[test]
    fn test_overlapping_fragments_are_consolidated() {
        let tree = node(json!({
            "code": "INVALID_RESPONSE_BODY",
            "path": ["a", "b"],
            "errors": [{"code": "MIN_LENGTH", "path": ["b", "c"]}]
        }));
        let result = serialize_errors(&tree, &[]);
        assert_eq!(result[0].fields.path, joined("a/b/c"));
    }

    #[test]
    fn test_input_is_not_modified() {
        let tree = node(json!({
            "code": "ONE_OF_MISSING",
            "path": ["p"],
            "inner": [{"code": "MIN_LENGTH", "path": ["q"]}]
        }));
        let before = tree.clone();
        let _ = serialize_errors(&tree, &[]);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut raw = NodeError::leaf(NodeFields {
            path: Some(ErrorPath::Segments(vec!["leaf".to_string()])),
            ..NodeFields::with_code("MIN_LENGTH")
        });
        for _ in 0..200_000 {
            raw = NodeError {
                fields: NodeFields::with_code("ANY_OF_MISSING"),
                errors: Some(vec![raw]),
                inner: None,
            };
        }
        let result = serialize_errors(&raw, &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fields.path, joined("leaf"));
    }
}
