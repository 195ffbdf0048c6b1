//! Scenario and operation aggregation
//!
//! Turns per-scenario outcomes into reportable errors tagged with the owning
//! operation and scenario. Inputs are already flat, so nothing here walks a
//! tree.

use crate::node::NodeError;
use crate::processor::{flatten_side, ValidationResult, ValidationResultSource};
use crate::severity::{severity_of_opt, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized outcome of validating one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub is_valid: bool,
    #[serde(default)]
    pub request: Vec<NodeError>,
    #[serde(default)]
    pub response: Vec<NodeError>,
}

impl ScenarioOutcome {
    /// Normalize a raw validation result into a scenario outcome
    pub fn from_result(result: &ValidationResult) -> Self {
        let request = flatten_side(&result.request_validation_result);
        let response = flatten_side(&result.response_validation_result);
        Self {
            is_valid: request.is_empty() && response.is_empty(),
            request,
            response,
        }
    }

    /// Flattened errors for one side
    pub fn errors(&self, source: ValidationResultSource) -> &[NodeError] {
        match source {
            ValidationResultSource::Request => &self.request,
            ValidationResultSource::Response => &self.response,
        }
    }
}

/// Scenario name to outcome, ordered by name
pub type Scenarios = BTreeMap<String, ScenarioOutcome>;

/// All scenarios recorded for one operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResultScenarios {
    pub operation_id: String,
    pub scenarios: Scenarios,
}

/// A single reportable failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelValidationError {
    pub operation_id: String,
    pub scenario: String,
    pub source: ValidationResultSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Own failures of a discriminator, already flattened
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<NodeError>,
    /// Alternatives of a discriminator failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<NodeError>,
}

impl ModelValidationError {
    /// Build a reportable error from a flattened node
    pub fn from_node(
        node: &NodeError,
        operation_id: &str,
        scenario: &str,
        source: ValidationResultSource,
    ) -> Self {
        Self {
            operation_id: operation_id.to_string(),
            scenario: scenario.to_string(),
            source,
            code: node.fields.code.clone(),
            severity: severity_of_opt(node.code()),
            path: node.fields.path.as_ref().map(|p| p.to_joined()),
            message: node.fields.message.clone(),
            errors: node.errors.clone().unwrap_or_default(),
            inner: node.inner.clone().unwrap_or_default(),
        }
    }
}

/// Reportable errors of one scenario, request side first
pub fn scenario_reducer<'a>(
    scenario_name: &'a str,
    scenario: &'a ScenarioOutcome,
    operation_id: &'a str,
) -> impl Iterator<Item = ModelValidationError> + 'a {
    [ValidationResultSource::Request, ValidationResultSource::Response]
        .into_iter()
        .flat_map(move |source| {
            scenario.errors(source).iter().map(move |node| {
                ModelValidationError::from_node(node, operation_id, scenario_name, source)
            })
        })
}

/// Reportable errors of every invalid scenario of an operation
pub fn operation_reducer(
    operation: &OperationResultScenarios,
) -> impl Iterator<Item = ModelValidationError> + '_ {
    operation
        .scenarios
        .iter()
        .filter(|(_, scenario)| !scenario.is_valid)
        .flat_map(move |(name, scenario)| {
            scenario_reducer(name, scenario, &operation.operation_id)
        })
}

/// Group errors by operation id, keeping their relative order
pub fn group_by_operation<'a, I>(errors: I) -> BTreeMap<&'a str, Vec<&'a ModelValidationError>>
where
    I: IntoIterator<Item = &'a ModelValidationError>,
{
    let mut grouped: BTreeMap<&str, Vec<&ModelValidationError>> = BTreeMap::new();
    for error in errors {
        grouped.entry(error.operation_id.as_str()).or_default().push(error);
    }
    grouped
}

/// Group errors by scenario name, keeping their relative order
pub fn group_by_scenario<'a, I>(errors: I) -> BTreeMap<&'a str, Vec<&'a ModelValidationError>>
where
    I: IntoIterator<Item = &'a ModelValidationError>,
{
    let mut grouped: BTreeMap<&str, Vec<&ModelValidationError>> = BTreeMap::new();
    for error in errors {
        grouped.entry(error.scenario.as_str()).or_default().push(error);
    }
    grouped
}
