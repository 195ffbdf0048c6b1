//! Severity summary over aggregated errors

use crate::aggregation::ModelValidationError;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts and overall severity of a set of reportable errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_code: BTreeMap<String, usize>,
    /// Most severe entry, `None` when there are no errors
    pub max_severity: Option<Severity>,
}

impl ValidationReport {
    pub fn from_errors<'a, I>(errors: I) -> Self
    where
        I: IntoIterator<Item = &'a ModelValidationError>,
    {
        let mut report = Self::default();
        for error in errors {
            report.total += 1;
            *report.by_severity.entry(error.severity).or_default() += 1;
            let code = error.code.clone().unwrap_or_else(|| "UNKNOWN".to_string());
            *report.by_code.entry(code).or_default() += 1;
            report.max_severity = report.max_severity.max(Some(error.severity));
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of errors with exactly this severity
    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Whether any error is at least as severe as `threshold`
    pub fn fails_at(&self, threshold: Severity) -> bool {
        self.max_severity
            .is_some_and(|severity| severity.is_at_least(threshold))
    }
}
