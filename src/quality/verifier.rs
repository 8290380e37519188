//! Structural verification of SPDX documents.
//!
//! Checks the uniqueness and well-formedness rules that downstream SPDX
//! tooling enforces. Verification never blocks writing: callers report the
//! violations and decide what to do with them.

use crate::model::{
    is_valid_expression, license_refs, ChecksumAlgorithm, RelationshipType, SpdxDocument,
    SpdxPackage, DATA_LICENSE, DOCUMENT_SPDX_ID, NOASSERTION, PURL_REFERENCE_TYPE, SPDX_VERSION,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

static SPDX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SPDXRef-[A-Za-z0-9.\-]+$").expect("static regex"));

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]+$").expect("static regex"));

/// A verification finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: ViolationSeverity,
    pub category: ViolationCategory,
    /// Human-readable message
    pub message: String,
    /// SPDX id of the offending element, if applicable
    pub element: Option<String>,
}

impl Violation {
    fn error(category: ViolationCategory, message: impl Into<String>, element: Option<&str>) -> Self {
        Self {
            severity: ViolationSeverity::Error,
            category,
            message: message.into(),
            element: element.map(str::to_string),
        }
    }

    fn warning(category: ViolationCategory, message: impl Into<String>, element: Option<&str>) -> Self {
        Self {
            severity: ViolationSeverity::Warning,
            ..Self::error(category, message, element)
        }
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// The document is not valid SPDX
    Error,
    /// Valid, but missing information consumers expect
    Warning,
}

/// Area of the document a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationCategory {
    DocumentHeader,
    Identifiers,
    Relationships,
    PackageInfo,
    LicenseInfo,
    Integrity,
}

impl ViolationCategory {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DocumentHeader => "Document Header",
            Self::Identifiers => "Identifiers",
            Self::Relationships => "Relationships",
            Self::PackageInfo => "Package Information",
            Self::LicenseInfo => "License Information",
            Self::Integrity => "Integrity",
        }
    }
}

/// Outcome of verifying one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True when there are no errors
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl VerificationResult {
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        let error_count = violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .count();
        let warning_count = violations.len() - error_count;
        Self {
            is_valid: error_count == 0,
            violations,
            error_count,
            warning_count,
        }
    }

    /// Violations of one severity
    #[must_use]
    pub fn by_severity(&self, severity: ViolationSeverity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Violations of one category
    #[must_use]
    pub fn by_category(&self, category: ViolationCategory) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.category == category)
            .collect()
    }
}

/// Verifier for compiled or deserialized SPDX documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentVerifier;

impl DocumentVerifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Verify a document
    #[must_use]
    pub fn verify(&self, doc: &SpdxDocument) -> VerificationResult {
        let mut violations = Vec::new();

        self.check_header(doc, &mut violations);
        let ids = self.check_identifiers(doc, &mut violations);
        self.check_relationships(doc, &ids, &mut violations);

        let declared: HashSet<&str> = doc
            .has_extracted_licensing_infos
            .iter()
            .map(|l| l.license_id.as_str())
            .collect();
        for package in &doc.packages {
            self.check_package(package, &declared, &mut violations);
        }

        let result = VerificationResult::new(violations);
        tracing::debug!(
            errors = result.error_count,
            warnings = result.warning_count,
            "Verified SPDX document"
        );
        result
    }

    fn check_header(&self, doc: &SpdxDocument, violations: &mut Vec<Violation>) {
        use ViolationCategory::DocumentHeader;

        if doc.spdx_version != SPDX_VERSION {
            violations.push(Violation::error(
                DocumentHeader,
                format!("spdxVersion is '{}', expected '{SPDX_VERSION}'", doc.spdx_version),
                None,
            ));
        }
        if doc.data_license != DATA_LICENSE {
            violations.push(Violation::error(
                DocumentHeader,
                format!("dataLicense must be {DATA_LICENSE}"),
                None,
            ));
        }
        if doc.spdx_id != DOCUMENT_SPDX_ID {
            violations.push(Violation::error(
                DocumentHeader,
                format!("document SPDXID must be {DOCUMENT_SPDX_ID}"),
                None,
            ));
        }
        if doc.name.trim().is_empty() {
            violations.push(Violation::error(DocumentHeader, "document name is empty", None));
        }
        match url::Url::parse(&doc.document_namespace) {
            Ok(ns) if ns.fragment().is_none() => {}
            Ok(_) => violations.push(Violation::error(
                DocumentHeader,
                "documentNamespace must not contain a '#' fragment",
                None,
            )),
            Err(e) => violations.push(Violation::error(
                DocumentHeader,
                format!("documentNamespace is not an absolute URI: {e}"),
                None,
            )),
        }
        if doc.creation_info.creators.is_empty() {
            violations.push(Violation::error(DocumentHeader, "no creators listed", None));
        }
        for creator in &doc.creation_info.creators {
            if !["Tool: ", "Person: ", "Organization: "]
                .iter()
                .any(|prefix| creator.starts_with(prefix))
            {
                violations.push(Violation::error(
                    DocumentHeader,
                    format!("creator '{creator}' must start with Tool:, Person: or Organization:"),
                    None,
                ));
            }
        }
        if chrono::DateTime::parse_from_rfc3339(&doc.creation_info.created).is_err() {
            violations.push(Violation::error(
                DocumentHeader,
                format!("created timestamp '{}' is not ISO-8601", doc.creation_info.created),
                None,
            ));
        }
    }

    /// Check SPDX ids and return the set of element ids in the document.
    fn check_identifiers<'d>(
        &self,
        doc: &'d SpdxDocument,
        violations: &mut Vec<Violation>,
    ) -> HashSet<&'d str> {
        let mut ids: HashSet<&str> = HashSet::new();
        ids.insert(doc.spdx_id.as_str());

        for package in &doc.packages {
            let id = package.spdx_id.as_str();
            if !SPDX_ID.is_match(id) {
                violations.push(Violation::error(
                    ViolationCategory::Identifiers,
                    format!("malformed SPDXID '{id}'"),
                    Some(id),
                ));
            }
            if !ids.insert(id) {
                violations.push(Violation::error(
                    ViolationCategory::Identifiers,
                    format!("duplicate SPDXID '{id}'"),
                    Some(id),
                ));
            }
        }

        if doc.document_describes.is_empty() {
            violations.push(Violation::warning(
                ViolationCategory::Relationships,
                "documentDescribes is empty",
                None,
            ));
        }
        for target in &doc.document_describes {
            if !ids.contains(target.as_str()) || target == DOCUMENT_SPDX_ID {
                violations.push(Violation::error(
                    ViolationCategory::Relationships,
                    format!("documentDescribes references unknown package '{target}'"),
                    Some(target),
                ));
            }
        }
        ids
    }

    fn check_relationships(
        &self,
        doc: &SpdxDocument,
        ids: &HashSet<&str>,
        violations: &mut Vec<Violation>,
    ) {
        let mut seen = HashSet::new();
        for rel in &doc.relationships {
            let from = rel.spdx_element_id.as_str();
            let to = rel.related_spdx_element.as_str();
            for endpoint in [from, to] {
                if !ids.contains(endpoint) {
                    violations.push(Violation::error(
                        ViolationCategory::Relationships,
                        format!("relationship endpoint '{endpoint}' does not exist"),
                        Some(from),
                    ));
                }
            }
            if rel.relationship_type == RelationshipType::DependsOn && from == to {
                violations.push(Violation::error(
                    ViolationCategory::Relationships,
                    format!("'{from}' depends on itself"),
                    Some(from),
                ));
            }
            if !seen.insert((from, rel.relationship_type, to)) {
                violations.push(Violation::warning(
                    ViolationCategory::Relationships,
                    format!("duplicate relationship {from} -> {to}"),
                    Some(from),
                ));
            }
        }
    }

    fn check_package(
        &self,
        package: &SpdxPackage,
        declared: &HashSet<&str>,
        violations: &mut Vec<Violation>,
    ) {
        let id = Some(package.spdx_id.as_str());

        if package.name.trim().is_empty() {
            violations.push(Violation::error(
                ViolationCategory::PackageInfo,
                "package name is empty",
                id,
            ));
        }
        match package.version_info.as_deref() {
            None | Some("") => violations.push(Violation::warning(
                ViolationCategory::PackageInfo,
                format!("package '{}' has no version", package.name),
                id,
            )),
            Some(NOASSERTION) => violations.push(Violation::warning(
                ViolationCategory::PackageInfo,
                format!("package '{}' version is NOASSERTION", package.name),
                id,
            )),
            Some(_) => {}
        }
        if let Some(supplier) = &package.supplier {
            let valid = supplier == NOASSERTION
                || ["Person: ", "Organization: "]
                    .iter()
                    .any(|prefix| supplier.starts_with(prefix));
            if !valid {
                violations.push(Violation::error(
                    ViolationCategory::PackageInfo,
                    format!("supplier '{supplier}' must start with Person: or Organization:"),
                    id,
                ));
            }
        }
        let location = package.download_location.as_str();
        if location != NOASSERTION && location != "NONE" && url::Url::parse(location).is_err() {
            violations.push(Violation::error(
                ViolationCategory::PackageInfo,
                format!("downloadLocation '{location}' is not a URL"),
                id,
            ));
        }

        for expr in [&package.license_declared, &package.license_concluded] {
            if !is_valid_expression(expr) {
                violations.push(Violation::error(
                    ViolationCategory::LicenseInfo,
                    format!("license expression '{expr}' does not parse"),
                    id,
                ));
            }
            for reference in license_refs(expr) {
                if !declared.contains(reference) {
                    violations.push(Violation::error(
                        ViolationCategory::LicenseInfo,
                        format!("'{reference}' is used but not declared"),
                        id,
                    ));
                }
            }
        }

        for external in &package.external_refs {
            if external.reference_type == PURL_REFERENCE_TYPE {
                if let Err(e) = packageurl::PackageUrl::from_str(&external.reference_locator) {
                    violations.push(Violation::error(
                        ViolationCategory::PackageInfo,
                        format!("invalid package URL '{}': {e}", external.reference_locator),
                        id,
                    ));
                }
            }
        }

        let external = !package.external_refs.is_empty();
        if external && package.checksum(ChecksumAlgorithm::Sha1).is_none() {
            violations.push(Violation::error(
                ViolationCategory::Integrity,
                "package with a package URL has no SHA1 checksum",
                id,
            ));
        }
        for checksum in &package.checksums {
            let value = checksum.checksum_value.as_str();
            if value.len() != checksum.algorithm.hex_len() || !HEX.is_match(value) {
                violations.push(Violation::error(
                    ViolationCategory::Integrity,
                    format!("{} checksum '{value}' is malformed", checksum.algorithm),
                    id,
                ));
            }
        }
    }
}
