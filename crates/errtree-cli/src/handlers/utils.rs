//! Shared utilities for command handlers

use crate::error::{Error, ErrorContext, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Whether a path names a YAML document
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a JSON or YAML document as a JSON value
///
/// JSON input may nest to any depth. YAML input is bounded by the YAML
/// parser's own nesting limit.
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).context("reading input file")?;
    debug!(path = %path.display(), bytes = content.len(), "Read input file");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            source: Some(Box::new(e)),
        })
    } else {
        errtree_core::json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            source: Some(Box::new(e)),
        })
    }
}
