//! Codes command handler

use crate::cli::CodesArgs;
use crate::error::Result;
use crate::output::{CodeEntry, OutputWriter};
use errtree_core::{descriptor, known_codes, severity_of};

/// Handle the codes command
pub fn handle_codes(args: CodesArgs, output: &mut OutputWriter) -> Result<()> {
    let entries = match args.code.as_deref() {
        Some(code) => {
            let entry = lookup(code);
            if !entry.known {
                output.info(&format!("{} is not a known code; treated as critical", entry.code))?;
            }
            vec![entry]
        }
        None => catalog(),
    };

    output.codes(&entries)
}

/// Catalog entries in declaration order
pub fn catalog() -> Vec<CodeEntry> {
    known_codes()
        .map(|descriptor| CodeEntry {
            code: descriptor.code.to_string(),
            severity: descriptor.severity,
            known: true,
        })
        .collect()
}

/// Entry for a single code, known or not
pub fn lookup(code: &str) -> CodeEntry {
    let code = code.trim();
    CodeEntry {
        code: code.to_string(),
        severity: severity_of(code),
        known: descriptor(code).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errtree_core::Severity;

    #[test]
    fn test_catalog_lists_every_code() {
        let entries = catalog();
        assert_eq!(entries.len(), 36);
        assert!(entries.iter().all(|entry| entry.known));
        assert_eq!(entries[0].code, "INVALID_TYPE");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("PII_MISMATCH").severity, Severity::Warning);
        assert_eq!(lookup(" INVALID_CONTENT_TYPE ").severity, Severity::Error);

        let unknown = lookup("SOMETHING_NEW");
        assert!(!unknown.known);
        assert_eq!(unknown.severity, Severity::Critical);
    }
}
