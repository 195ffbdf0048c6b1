//! Severity catalog for validator error codes
//!
//! Every code the upstream validator is known to emit maps to a fixed
//! [`Severity`]. The catalog is built once and is read-only afterwards, so it
//! can be consulted from any number of threads. Lookups are total: a code that
//! is not in the catalog is treated as [`Severity::Critical`] so that it can
//! never slip past severity-based gating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Known validator error codes
pub mod codes {
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const ENUM_MISMATCH: &str = "ENUM_MISMATCH";
    pub const ENUM_CASE_MISMATCH: &str = "ENUM_CASE_MISMATCH";
    pub const PII_MISMATCH: &str = "PII_MISMATCH";
    pub const ANY_OF_MISSING: &str = "ANY_OF_MISSING";
    pub const ONE_OF_MISSING: &str = "ONE_OF_MISSING";
    pub const ONE_OF_MULTIPLE: &str = "ONE_OF_MULTIPLE";
    pub const NOT_PASSED: &str = "NOT_PASSED";

    // arrays
    pub const ARRAY_LENGTH_SHORT: &str = "ARRAY_LENGTH_SHORT";
    pub const ARRAY_LENGTH_LONG: &str = "ARRAY_LENGTH_LONG";
    pub const ARRAY_UNIQUE: &str = "ARRAY_UNIQUE";
    pub const ARRAY_ADDITIONAL_ITEMS: &str = "ARRAY_ADDITIONAL_ITEMS";

    // numeric
    pub const MULTIPLE_OF: &str = "MULTIPLE_OF";
    pub const MINIMUM: &str = "MINIMUM";
    pub const MINIMUM_EXCLUSIVE: &str = "MINIMUM_EXCLUSIVE";
    pub const MAXIMUM: &str = "MAXIMUM";
    pub const MAXIMUM_EXCLUSIVE: &str = "MAXIMUM_EXCLUSIVE";

    // objects
    pub const OBJECT_PROPERTIES_MINIMUM: &str = "OBJECT_PROPERTIES_MINIMUM";
    pub const OBJECT_PROPERTIES_MAXIMUM: &str = "OBJECT_PROPERTIES_MAXIMUM";
    pub const OBJECT_MISSING_REQUIRED_PROPERTY: &str = "OBJECT_MISSING_REQUIRED_PROPERTY";
    pub const OBJECT_ADDITIONAL_PROPERTIES: &str = "OBJECT_ADDITIONAL_PROPERTIES";
    pub const OBJECT_DEPENDENCY_KEY: &str = "OBJECT_DEPENDENCY_KEY";

    // strings
    pub const MIN_LENGTH: &str = "MIN_LENGTH";
    pub const MAX_LENGTH: &str = "MAX_LENGTH";
    pub const PATTERN: &str = "PATTERN";

    // operation lookup
    pub const OPERATION_NOT_FOUND_IN_CACHE: &str = "OPERATION_NOT_FOUND_IN_CACHE";
    pub const OPERATION_NOT_FOUND_IN_CACHE_WITH_VERB: &str = "OPERATION_NOT_FOUND_IN_CACHE_WITH_VERB";
    pub const OPERATION_NOT_FOUND_IN_CACHE_WITH_API: &str = "OPERATION_NOT_FOUND_IN_CACHE_WITH_API";
    pub const OPERATION_NOT_FOUND_IN_CACHE_WITH_PROVIDER: &str =
        "OPERATION_NOT_FOUND_IN_CACHE_WITH_PROVIDER";
    pub const MULTIPLE_OPERATIONS_FOUND: &str = "MULTIPLE_OPERATIONS_FOUND";

    // request/response
    pub const INVALID_RESPONSE_HEADER: &str = "INVALID_RESPONSE_HEADER";
    pub const INVALID_RESPONSE_CODE: &str = "INVALID_RESPONSE_CODE";
    pub const INVALID_RESPONSE_BODY: &str = "INVALID_RESPONSE_BODY";
    pub const INVALID_REQUEST_PARAMETER: &str = "INVALID_REQUEST_PARAMETER";
    pub const INVALID_CONTENT_TYPE: &str = "INVALID_CONTENT_TYPE";
}

/// How strictly an error code is treated by reporting and gating
///
/// Variants are declared from least to most strict, so `Ord` and `max()`
/// pick the most severe value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth reviewing, does not fail a payload on its own
    Warning,
    /// Real mismatch that tolerant clients usually survive
    Error,
    /// Contract violation
    Critical,
}

impl Severity {
    /// All severities, most strict first
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Error, Severity::Warning];

    /// Whether this severity is at least as strict as `threshold`
    pub fn is_at_least(self, threshold: Severity) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(crate::Error::invalid_input(format!(
                "unknown severity '{other}', expected one of: critical, error, warning"
            ))),
        }
    }
}

/// A catalog entry: an error code and the severity it is reported with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationErrorDescriptor {
    pub code: &'static str,
    pub severity: Severity,
}

impl ValidationErrorDescriptor {
    const fn new(code: &'static str, severity: Severity) -> Self {
        Self { code, severity }
    }
}

const CATALOG: &[ValidationErrorDescriptor] = &[
    ValidationErrorDescriptor::new(codes::INVALID_TYPE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_FORMAT, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ENUM_MISMATCH, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ENUM_CASE_MISMATCH, Severity::Error),
    ValidationErrorDescriptor::new(codes::PII_MISMATCH, Severity::Warning),
    ValidationErrorDescriptor::new(codes::ANY_OF_MISSING, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ONE_OF_MISSING, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ONE_OF_MULTIPLE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::NOT_PASSED, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ARRAY_LENGTH_SHORT, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ARRAY_LENGTH_LONG, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ARRAY_UNIQUE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::ARRAY_ADDITIONAL_ITEMS, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MULTIPLE_OF, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MINIMUM, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MINIMUM_EXCLUSIVE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MAXIMUM, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MAXIMUM_EXCLUSIVE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OBJECT_PROPERTIES_MINIMUM, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OBJECT_PROPERTIES_MAXIMUM, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OBJECT_MISSING_REQUIRED_PROPERTY, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OBJECT_ADDITIONAL_PROPERTIES, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OBJECT_DEPENDENCY_KEY, Severity::Warning),
    ValidationErrorDescriptor::new(codes::MIN_LENGTH, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MAX_LENGTH, Severity::Critical),
    ValidationErrorDescriptor::new(codes::PATTERN, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OPERATION_NOT_FOUND_IN_CACHE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OPERATION_NOT_FOUND_IN_CACHE_WITH_VERB, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OPERATION_NOT_FOUND_IN_CACHE_WITH_API, Severity::Critical),
    ValidationErrorDescriptor::new(codes::OPERATION_NOT_FOUND_IN_CACHE_WITH_PROVIDER, Severity::Critical),
    ValidationErrorDescriptor::new(codes::MULTIPLE_OPERATIONS_FOUND, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_RESPONSE_HEADER, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_RESPONSE_CODE, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_RESPONSE_BODY, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_REQUEST_PARAMETER, Severity::Critical),
    ValidationErrorDescriptor::new(codes::INVALID_CONTENT_TYPE, Severity::Error),
];

static CATALOG_INDEX: OnceLock<HashMap<&'static str, &'static ValidationErrorDescriptor>> =
    OnceLock::new();

fn catalog_index() -> &'static HashMap<&'static str, &'static ValidationErrorDescriptor> {
    CATALOG_INDEX.get_or_init(|| CATALOG.iter().map(|d| (d.code, d)).collect())
}

/// Look up the catalog entry for a code
pub fn descriptor(code: &str) -> Option<&'static ValidationErrorDescriptor> {
    catalog_index().get(code).copied()
}

/// Severity of an error code; unknown codes are critical
pub fn severity_of(code: &str) -> Severity {
    descriptor(code)
        .map(|d| d.severity)
        .unwrap_or(Severity::Critical)
}

/// Severity of an optional code; a node without a code is critical
pub fn severity_of_opt(code: Option<&str>) -> Severity {
    code.map(severity_of).unwrap_or(Severity::Critical)
}

/// Iterate the catalog in declaration order
pub fn known_codes() -> impl Iterator<Item = &'static ValidationErrorDescriptor> {
    CATALOG.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_severity() {
        assert_eq!(severity_of(codes::INVALID_TYPE), Severity::Critical);
        assert_eq!(severity_of(codes::ENUM_CASE_MISMATCH), Severity::Error);
        assert_eq!(severity_of(codes::INVALID_CONTENT_TYPE), Severity::Error);
        assert_eq!(severity_of(codes::PII_MISMATCH), Severity::Warning);
        assert_eq!(severity_of(codes::OBJECT_DEPENDENCY_KEY), Severity::Warning);
    }

    #[test]
    fn test_unknown_code_is_critical() {
        assert_eq!(severity_of("SOMETHING_NEW"), Severity::Critical);
        assert_eq!(severity_of(""), Severity::Critical);
        assert_eq!(severity_of("invalid_type"), Severity::Critical);
        assert_eq!(severity_of_opt(None), Severity::Critical);
        assert!(descriptor("SOMETHING_NEW").is_none());
    }

    #[test]
    fn test_catalog_has_no_duplicate_codes() {
        assert_eq!(catalog_index().len(), CATALOG.len());
        assert_eq!(known_codes().count(), 36);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Critical.is_at_least(Severity::Error));
        assert!(!Severity::Warning.is_at_least(Severity::Error));
        assert_eq!(
            [Severity::Warning, Severity::Critical, Severity::Error].iter().max(),
            Some(&Severity::Critical)
        );
    }

    #[test]
    fn test_severity_display_and_parse() {
        for severity in Severity::ALL {
            let parsed: Severity = severity.to_string().parse().unwrap();
            assert_eq!(parsed, severity);
        }
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_serde() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        let parsed: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Severity::Warning);
    }
}
