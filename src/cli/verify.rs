//! Verify command handler.
//!
//! Implements the `verify` subcommand for checking a written SPDX JSON
//! document.

use crate::model::SpdxDocument;
use crate::pipeline::{exit_codes, verify_document};
use crate::quality::{VerificationResult, ViolationSeverity};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Run the verify command, returning the desired exit code.
///
/// Exits with 1 when the document has errors, or warnings with
/// `fail_on_warning`.
pub fn run_verify(document_path: &Path, fail_on_warning: bool, quiet: bool) -> Result<i32> {
    let content = std::fs::read_to_string(document_path)
        .with_context(|| format!("Failed to read SPDX document: {}", document_path.display()))?;
    let document = SpdxDocument::from_json(&content)
        .with_context(|| format!("Failed to parse SPDX document: {}", document_path.display()))?;

    let result = verify_document(&document, quiet);
    print!("{}", format_violations(&result));

    let failed = result.error_count > 0 || (fail_on_warning && result.warning_count > 0);
    Ok(if failed {
        exit_codes::VERIFICATION_FAILED
    } else {
        exit_codes::SUCCESS
    })
}

/// One line per violation followed by a summary line
fn format_violations(result: &VerificationResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let level = match v.severity {
            ViolationSeverity::Error => "error",
            ViolationSeverity::Warning => "warning",
        };
        let _ = write!(out, "{level}[{}]", v.category.name());
        if let Some(element) = &v.element {
            let _ = write!(out, " {element}");
        }
        let _ = writeln!(out, ": {}", v.message);
    }
    let _ = writeln!(
        out,
        "{} error(s), {} warning(s)",
        result.error_count, result.warning_count
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{Violation, ViolationCategory};

    #[test]
    fn test_format_violations() {
        let result = VerificationResult::new(vec![Violation {
            severity: ViolationSeverity::Error,
            category: ViolationCategory::Relationships,
            message: "relationship target does not exist".to_string(),
            element: Some("SPDXRef-app".to_string()),
        }]);
        let text = format_violations(&result);
        assert!(text.starts_with("error["));
        assert!(text.contains("SPDXRef-app: relationship target does not exist"));
        assert!(text.ends_with("1 error(s), 0 warning(s)\n"));
    }

    #[test]
    fn test_verify_missing_file_is_error() {
        assert!(run_verify(Path::new("/nonexistent/doc.spdx.json"), false, true).is_err());
    }
}
