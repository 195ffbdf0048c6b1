//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// errtree - normalize and report validator error trees
///
/// Flattens the nested error trees produced by schema validators into
/// severity-classified errors with canonical paths, and aggregates them
/// per operation and scenario.
#[derive(Parser, Debug)]
#[command(
    name = "errtree",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ERRTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or output.format from config]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize the error trees of a single validation result
    Normalize(NormalizeArgs),

    /// Aggregate per-operation scenario results into a severity report
    Report(ReportArgs),

    /// List known error codes or look up the severity of one code
    Codes(CodesArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Validation result file with request and response sides (JSON or YAML)
    #[arg(value_name = "RESULT_FILE")]
    pub result_file: PathBuf,

    /// Save the normalized result to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// File mapping operation ids to scenario results (JSON or YAML)
    #[arg(value_name = "OPERATIONS_FILE")]
    pub operations_file: PathBuf,

    /// Fail when an error at or above this severity exists [default: report.fail_on from config]
    #[arg(long, value_enum)]
    pub fail_on: Option<SeverityArg>,

    /// Only print the summary, not the individual errors
    #[arg(long)]
    pub summary_only: bool,
}

/// Arguments for the codes command
#[derive(Parser, Debug)]
pub struct CodesArgs {
    /// Error code to look up (lists the whole catalog if omitted)
    #[arg(value_name = "CODE")]
    pub code: Option<String>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse a format name as written in configuration files
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Severity threshold for the report command
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    /// Fail on any error
    Warning,
    /// Fail on errors and critical errors
    Error,
    /// Fail only on critical errors
    Critical,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<SeverityArg> for errtree_core::Severity {
    fn from(severity: SeverityArg) -> Self {
        match severity {
            SeverityArg::Warning => errtree_core::Severity::Warning,
            SeverityArg::Error => errtree_core::Severity::Error,
            SeverityArg::Critical => errtree_core::Severity::Critical,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
