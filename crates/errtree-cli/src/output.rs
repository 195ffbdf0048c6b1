//! Output formatting and writing utilities
//!
//! This module formats normalized results, aggregated errors and severity
//! reports as JSON, YAML or human-readable text.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use errtree_core::{
    group_by_operation, group_by_scenario, ModelValidationError, NodeError, Severity,
    ValidationReport, ValidationResult, ValidationResultSource,
};
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Everything the `report` command prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument<'a> {
    pub errors: &'a [ModelValidationError],
    pub summary: &'a ValidationReport,
    pub fail_on: Severity,
    pub passed: bool,
}

/// One row of the `codes` listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeEntry {
    pub code: String,
    pub severity: Severity,
    pub known: bool,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a normalized validation result
    fn format_normalized(&self, result: &ValidationResult, use_color: bool) -> Result<String>;

    /// Format aggregated errors and their summary
    fn format_report(&self, document: &ReportDocument<'_>, use_color: bool) -> Result<String>;

    /// Format catalog entries
    fn format_codes(&self, entries: &[CodeEntry], use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human output falls back to pretty JSON for arbitrary values
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_normalized(&self, result: &ValidationResult, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_normalized_human(result, use_color)),
            _ => self.format(result),
        }
    }

    fn format_report(&self, document: &ReportDocument<'_>, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(document, use_color)),
            _ => self.format(document),
        }
    }

    fn format_codes(&self, entries: &[CodeEntry], use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_codes_human(entries, use_color)),
            _ => self.format(&entries),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message (human format only)
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message (human format only)
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message (human format only)
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a normalized validation result
    pub fn normalized(&mut self, result: &ValidationResult) -> Result<()> {
        let formatted = self.format.format_normalized(result, self.use_color)?;
        self.emit(formatted)
    }

    /// Write aggregated errors with their summary
    pub fn report(&mut self, document: &ReportDocument<'_>) -> Result<()> {
        let formatted = self.format.format_report(document, self.use_color)?;
        self.emit(formatted)
    }

    /// Write catalog entries
    pub fn codes(&mut self, entries: &[CodeEntry]) -> Result<()> {
        let formatted = self.format.format_codes(entries, self.use_color)?;
        self.emit(formatted)
    }

    fn emit(&mut self, formatted: String) -> Result<()> {
        trace!(bytes = formatted.len(), format = ?self.format, "Writing output");
        self.writeln(formatted.trim_end_matches('\n'))
    }
}

/// Severity label, colored by strictness
pub fn severity_label(severity: Severity, use_color: bool) -> String {
    let label = severity.to_string().to_uppercase();
    if !use_color {
        return label;
    }
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Error => label.red().to_string(),
        Severity::Warning => label.yellow().to_string(),
    }
}

/// One line describing a flattened error node
fn format_node_line(node: &NodeError, use_color: bool) -> String {
    let severity = errtree_core::severity_of_opt(node.code());
    let mut line = format!(
        "[{}] {}",
        severity_label(severity, use_color),
        node.code().unwrap_or("UNKNOWN")
    );
    if let Some(path) = &node.fields.path {
        line.push_str(&format!(" at {}", path.to_joined()));
    }
    if let Some(message) = &node.fields.message {
        line.push_str(&format!(": {}", message));
    }
    line
}

/// Append a node and, for discriminators, its own errors and surviving alternatives
fn push_node(output: &mut String, node: &NodeError, depth: usize, use_color: bool) {
    let mut pending = vec![(node, depth)];
    while let Some((node, depth)) = pending.pop() {
        let indent = "  ".repeat(depth);
        output.push_str(&format!("{}{}\n", indent, format_node_line(node, use_color)));
        if node.inner.as_ref().is_some_and(Vec::is_empty) {
            output.push_str(&format!("{}  (no alternative matched)\n", indent));
        }

        let errors = node.errors.as_deref().unwrap_or_default();
        let inner = node.inner.as_deref().unwrap_or_default();
        pending.extend(errors.iter().chain(inner).rev().map(|child| (child, depth + 1)));
    }
}

/// Format a normalized result for human reading
fn format_normalized_human(result: &ValidationResult, use_color: bool) -> String {
    let mut output = String::new();

    for source in [ValidationResultSource::Request, ValidationResultSource::Response] {
        let errors = result.side(source).errors.as_deref().unwrap_or_default();
        let title = format!("{} ({} error(s))", capitalize(&source.to_string()), errors.len());
        if use_color {
            output.push_str(&format!("{}\n", title.bold()));
        } else {
            output.push_str(&format!("{}\n", title));
        }

        if errors.is_empty() {
            output.push_str("  ✓ no errors\n");
        }
        for error in errors {
            push_node(&mut output, error, 1, use_color);
        }
        output.push('\n');
    }

    output
}

/// Format the summary counts of a report
fn format_summary_human(summary: &ValidationReport, use_color: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Total: {}\n", summary.total));
    for severity in Severity::ALL {
        output.push_str(&format!(
            "  {}: {}\n",
            severity_label(severity, use_color),
            summary.count(severity)
        ));
    }

    if !summary.by_code.is_empty() {
        output.push_str("By code:\n");
        for (code, count) in &summary.by_code {
            output.push_str(&format!("  • {}: {}\n", code, count));
        }
    }

    output
}

/// Format aggregated errors, grouped by operation then scenario
fn format_report_human(document: &ReportDocument<'_>, use_color: bool) -> String {
    let mut output = String::new();

    if document.summary.is_empty() {
        output.push_str("✓ All scenarios passed\n");
    }

    for (operation_id, errors) in group_by_operation(document.errors) {
        let heading = format!("═══ {} ═══", operation_id);
        if use_color {
            output.push_str(&format!("{}\n", heading.bright_blue()));
        } else {
            output.push_str(&format!("{}\n", heading));
        }

        for (scenario, scenario_errors) in group_by_scenario(errors) {
            output.push_str(&format!("  Scenario: {}\n", scenario));
            for error in scenario_errors {
                output.push_str(&format!(
                    "    {} [{}] {}",
                    error.source,
                    severity_label(error.severity, use_color),
                    error.code.as_deref().unwrap_or("UNKNOWN")
                ));
                if let Some(path) = &error.path {
                    output.push_str(&format!(" at {}", path));
                }
                if let Some(message) = &error.message {
                    output.push_str(&format!(": {}", message));
                }
                output.push('\n');
                for child in error.errors.iter().chain(&error.inner) {
                    push_node(&mut output, child, 3, use_color);
                }
            }
        }
        output.push('\n');
    }

    output.push_str(&format_summary_human(document.summary, use_color));

    let verdict = if document.passed {
        format!("PASSED (fail on: {})", document.fail_on)
    } else {
        format!("FAILED (fail on: {})", document.fail_on)
    };
    if use_color && document.passed {
        output.push_str(&format!("{}\n", verdict.green().bold()));
    } else if use_color {
        output.push_str(&format!("{}\n", verdict.red().bold()));
    } else {
        output.push_str(&format!("{}\n", verdict));
    }

    output
}

/// Format catalog entries as an aligned table
fn format_codes_human(entries: &[CodeEntry], use_color: bool) -> String {
    let width = entries.iter().map(|e| e.code.len()).max().unwrap_or(0);
    let mut output = String::new();

    for entry in entries {
        output.push_str(&format!(
            "{:width$}  {}",
            entry.code,
            severity_label(entry.severity, use_color),
            width = width
        ));
        if !entry.known {
            output.push_str("  (not in catalog)");
        }
        output.push('\n');
    }

    output
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
