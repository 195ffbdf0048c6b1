//! Normalize command handler

use super::utils::{is_yaml, load_document};
use crate::cli::NormalizeArgs;
use crate::error::{ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use errtree_core::{process_validation_errors, ValidationResult};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Handle the normalize command
#[instrument(skip(output), fields(file = %args.result_file.display()))]
pub fn handle_normalize(args: NormalizeArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details(
        "normalize_command",
        &format!("file: {}", args.result_file.display()),
    );

    let document = load_document(&args.result_file)?;
    let raw = ValidationResult::from_value(document)
        .with_context(|| format!("{} is not a validation result", args.result_file.display()))?;

    let processed = process_validation_errors(&raw);
    info!(
        request_errors = processed.request_validation_result.errors.as_ref().map_or(0, Vec::len),
        response_errors = processed.response_validation_result.errors.as_ref().map_or(0, Vec::len),
        "Normalized validation result"
    );

    output.normalized(&processed)?;

    if let Some(path) = &args.save_to {
        save_result(&processed, path)?;
        output.success(&format!("✓ Normalized result saved to {}", path.display()))?;
    }

    Ok(())
}

/// Write a normalized result as YAML or pretty JSON, chosen by extension
fn save_result(result: &ValidationResult, path: &Path) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)?
    };
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
