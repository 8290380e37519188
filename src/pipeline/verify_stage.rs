//! Structural verification stage.

use crate::model::SpdxDocument;
use crate::quality::{DocumentVerifier, VerificationResult, ViolationSeverity};

/// Verify a document and log every violation.
///
/// Violations are reported, never fixed; whether they fail the run is the
/// caller's decision.
pub fn verify_document(document: &SpdxDocument, quiet: bool) -> VerificationResult {
    let result = DocumentVerifier::new().verify(document);

    for violation in &result.violations {
        let element = violation.element.as_deref().unwrap_or("-");
        match violation.severity {
            ViolationSeverity::Error => tracing::warn!(
                category = violation.category.name(),
                element,
                "SPDX verification error: {}",
                violation.message
            ),
            ViolationSeverity::Warning => tracing::debug!(
                category = violation.category.name(),
                element,
                "SPDX verification warning: {}",
                violation.message
            ),
        }
    }

    if !quiet {
        tracing::info!(
            errors = result.error_count,
            warnings = result.warning_count,
            "Verified SPDX document"
        );
    }
    result
}
