//! errtree core - normalization of validator error trees
//!
//! Schema validators report failures as deeply nested trees: composition
//! keywords wrap their alternatives, request parameters wrap their schema
//! failures, and every level contributes a fragment of the property path.
//! This crate turns such a tree into a flat, severity-classified list of
//! errors with canonical `/`-joined paths.
//!
//! # Main Components
//!
//! - **Severity Catalog** ([`severity`]): error code to [`Severity`], unknown codes are critical
//! - **Node Model** ([`node`]): the validator's wire shape and the ingested [`ErrorTree`]
//! - **Path Consolidator** ([`path`]): overlap-aware merge of path fragments
//! - **Tree Serializer** ([`serializer`]): flattening, rewrites and false-positive filtering
//! - **Result Processor** ([`processor`]): normalizes request and response sides of a result
//! - **Aggregation** ([`aggregation`], [`report`]): per-scenario and per-operation reporting
//!
//! # Example
//!
//! ```rust
//! use errtree_core::{process_validation_errors, ValidationResult};
//! use serde_json::json;
//!
//! let raw = ValidationResult::from_value(json!({
//!     "requestValidationResult": {"errors": []},
//!     "responseValidationResult": {"errors": [{
//!         "code": "ONE_OF_MISSING",
//!         "inner": [
//!             {"code": "INVALID_TYPE", "params": ["null"]},
//!             {"code": "INVALID_TYPE", "params": ["string"], "path": ["foo"]}
//!         ]
//!     }]}
//! })).unwrap();
//!
//! let processed = process_validation_errors(&raw);
//! let errors = processed.response_validation_result.errors.as_deref().unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].inner.as_ref().unwrap().len(), 1);
//! ```

pub mod aggregation;
pub mod error;
pub mod json;
pub mod node;
pub mod path;
pub mod processor;
pub mod report;
pub mod serializer;
pub mod severity;

// Re-export main types for convenience
pub use aggregation::{
    group_by_operation, group_by_scenario, operation_reducer, scenario_reducer,
    ModelValidationError, OperationResultScenarios, ScenarioOutcome, Scenarios,
};
pub use error::{Error, Result};
pub use node::{ErrorPath, ErrorTree, NodeError, NodeFields, ParameterLocation};
pub use path::{consolidate_path, join_path, PATH_SEPARATOR};
pub use processor::{
    flatten_side, process_validation_errors, ValidationResult, ValidationResultSource,
};
pub use report::ValidationReport;
pub use serializer::{is_true_error, rewrite_path, serialize_errors, serialize_tree};
pub use severity::{
    codes, descriptor, known_codes, severity_of, severity_of_opt, Severity,
    ValidationErrorDescriptor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
