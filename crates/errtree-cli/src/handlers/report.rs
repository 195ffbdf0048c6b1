//! Report command handler
//!
//! Reads `{operationId: {scenarioName: ValidationResult}}`, normalizes every
//! scenario and aggregates the failures into a severity report.

use super::utils::load_document;
use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, ReportDocument};
use errtree_core::{
    operation_reducer, ModelValidationError, OperationResultScenarios, ScenarioOutcome, Scenarios,
    ValidationReport, ValidationResult,
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Handle the report command
#[instrument(skip(config, output), fields(file = %args.operations_file.display()))]
pub fn handle_report(args: ReportArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details(
        "report_command",
        &format!("file: {}", args.operations_file.display()),
    );

    let document = load_document(&args.operations_file)?;
    let operations = parse_operations(document, &args.operations_file)?;
    if operations.is_empty() {
        output.warning(&format!(
            "No operations found in {}",
            args.operations_file.display()
        ))?;
    }

    let errors: Vec<ModelValidationError> = operations.iter().flat_map(operation_reducer).collect();
    let summary = ValidationReport::from_errors(&errors);
    let fail_on = config.fail_on(args.fail_on.map(Into::into));
    let passed = !summary.fails_at(fail_on);

    info!(
        operations = operations.len(),
        errors = summary.total,
        max_severity = ?summary.max_severity,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Aggregated validation report"
    );

    output.report(&ReportDocument {
        errors: if args.summary_only { &errors[..0] } else { &errors[..] },
        summary: &summary,
        fail_on,
        passed,
    })?;

    if passed {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            count: errors
                .iter()
                .filter(|error| error.severity.is_at_least(fail_on))
                .count(),
            threshold: fail_on,
        })
    }
}

/// Normalize every scenario of every operation in the document
pub fn parse_operations(document: Value, path: &Path) -> Result<Vec<OperationResultScenarios>> {
    let Value::Object(operations) = document else {
        return Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "an object of operation ids".to_string(),
            source: None,
        });
    };

    let mut parsed = Vec::with_capacity(operations.len());
    for (operation_id, scenarios) in operations {
        let Value::Object(scenarios) = scenarios else {
            return Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: format!("an object of scenarios for operation '{}'", operation_id),
                source: None,
            });
        };

        let mut outcomes = Scenarios::new();
        for (name, result) in scenarios {
            let result = ValidationResult::from_value(result)
                .with_context(|| format!("operation '{}', scenario '{}'", operation_id, name))?;
            outcomes.insert(name, ScenarioOutcome::from_result(&result));
        }

        debug!(operation_id = %operation_id, scenarios = outcomes.len(), "Normalized operation");
        parsed.push(OperationResultScenarios {
            operation_id,
            scenarios: outcomes,
        });
    }

    Ok(parsed)
}
