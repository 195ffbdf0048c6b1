//! Command handlers for CLI subcommands
//!
//! Each subcommand has its own module; shared file loading lives in `utils`.

pub mod codes;
pub mod completions;
pub mod normalize;
pub mod report;
pub mod utils;

pub use codes::handle_codes;
pub use completions::handle_completions;
pub use normalize::handle_normalize;
pub use report::handle_report;
