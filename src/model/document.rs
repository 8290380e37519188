//! SPDX 2.3 document model.
//!
//! Only the entities and fields the compiler populates are modelled. Field
//! names follow the SPDX 2.3 JSON schema so the structures round-trip through
//! `serde_json` unchanged.

use super::NOASSERTION;
use crate::error::{ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SPDX specification version written into every document
pub const SPDX_VERSION: &str = "SPDX-2.3";

/// Data license mandated by the SPDX specification
pub const DATA_LICENSE: &str = "CC0-1.0";

/// SPDX id of the document itself
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

/// Root of an SPDX document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    pub spdx_version: String,
    pub data_license: String,
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    pub document_namespace: String,
    pub creation_info: CreationInfo,
    #[serde(default)]
    pub document_describes: Vec<String>,
    #[serde(default)]
    pub packages: Vec<SpdxPackage>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_extracted_licensing_infos: Vec<ExtractedLicensingInfo>,
}

impl SpdxDocument {
    /// Empty document with the mandatory header fields filled in
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, creation_info: CreationInfo) -> Self {
        Self {
            spdx_version: SPDX_VERSION.to_string(),
            data_license: DATA_LICENSE.to_string(),
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: name.into(),
            document_namespace: namespace.into(),
            creation_info,
            document_describes: Vec::new(),
            packages: Vec::new(),
            relationships: Vec::new(),
            has_extracted_licensing_infos: Vec::new(),
        }
    }

    /// Find a package by SPDX id
    #[must_use]
    pub fn package(&self, spdx_id: &str) -> Option<&SpdxPackage> {
        self.packages.iter().find(|p| p.spdx_id == spdx_id)
    }

    /// Find a package by name
    #[must_use]
    pub fn package_by_name(&self, name: &str) -> Option<&SpdxPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// SPDX ids of the direct DEPENDS_ON targets of a package
    #[must_use]
    pub fn dependencies_of(&self, spdx_id: &str) -> Vec<&str> {
        self.relationships
            .iter()
            .filter(|r| {
                r.spdx_element_id == spdx_id && r.relationship_type == RelationshipType::DependsOn
            })
            .map(|r| r.related_spdx_element.as_str())
            .collect()
    }

    /// Serialize as pretty-printed SPDX JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing SPDX document")
    }

    /// Serialize as compact SPDX JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serializing SPDX document")
    }

    /// Parse SPDX JSON
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("parsing SPDX document")
    }
}

/// Document creation info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationInfo {
    /// ISO-8601 UTC timestamp, second precision
    pub created: String,
    pub creators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_list_version: Option<String>,
}

/// A package entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    pub download_location: String,
    #[serde(default)]
    pub files_analyzed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
    #[serde(default = "no_assertion")]
    pub license_concluded: String,
    #[serde(default = "no_assertion")]
    pub license_declared: String,
    #[serde(default = "no_assertion")]
    pub copyright_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<Checksum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalRef>,
}

fn no_assertion() -> String {
    NOASSERTION.to_string()
}

impl SpdxPackage {
    /// Package with every optional field unset and NOASSERTION placeholders
    pub fn new(spdx_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spdx_id: spdx_id.into(),
            name: name.into(),
            version_info: None,
            supplier: None,
            download_location: no_assertion(),
            files_analyzed: false,
            homepage: None,
            source_info: None,
            license_concluded: no_assertion(),
            license_declared: no_assertion(),
            copyright_text: no_assertion(),
            description: None,
            checksums: Vec::new(),
            external_refs: Vec::new(),
        }
    }

    /// Checksum value for an algorithm
    #[must_use]
    pub fn checksum(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        self.checksums
            .iter()
            .find(|c| c.algorithm == algorithm)
            .map(|c| c.checksum_value.as_str())
    }

    /// The package URL, if one was attached
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        self.external_refs
            .iter()
            .find(|r| r.reference_type == PURL_REFERENCE_TYPE)
            .map(|r| r.reference_locator.as_str())
    }
}

/// Checksum algorithms the compiler emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    Sha1,
    Sha256,
}

impl ChecksumAlgorithm {
    /// Length of the lowercase hex digest
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
        }
    }
}

/// Package checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub checksum_value: String,
}

impl Checksum {
    pub fn new(algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            checksum_value: value.into(),
        }
    }
}

/// Reference category for package-manager locators
pub const PACKAGE_MANAGER_CATEGORY: &str = "PACKAGE-MANAGER";

/// Reference type for package URLs
pub const PURL_REFERENCE_TYPE: &str = "purl";

/// External reference of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
}

impl ExternalRef {
    /// Package URL reference
    pub fn purl(locator: impl Into<String>) -> Self {
        Self {
            reference_category: PACKAGE_MANAGER_CATEGORY.to_string(),
            reference_type: PURL_REFERENCE_TYPE.to_string(),
            reference_locator: locator.into(),
        }
    }
}

/// Relationship kinds the compiler emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    DependsOn,
    Describes,
    #[serde(other)]
    Other,
}

/// Directed relationship between two SPDX elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub spdx_element_id: String,
    pub relationship_type: RelationshipType,
    pub related_spdx_element: String,
}

impl Relationship {
    pub fn depends_on(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            spdx_element_id: from.into(),
            relationship_type: RelationshipType::DependsOn,
            related_spdx_element: to.into(),
        }
    }
}

/// Document-local license declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLicensingInfo {
    pub license_id: String,
    pub extracted_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub see_alsos: Vec<String>,
}

impl From<&super::ExtractedLicense> for ExtractedLicensingInfo {
    fn from(license: &super::ExtractedLicense) -> Self {
        Self {
            license_id: license.license_id.clone(),
            extracted_text: license.extracted_text.clone(),
            name: Some(license.name.clone()),
            see_alsos: vec![license.see_also.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpdxDocument {
        let mut doc = SpdxDocument::new(
            "sample",
            "https://example.com/spdx/sample",
            CreationInfo {
                created: "2024-01-01T00:00:00Z".to_string(),
                creators: vec!["Tool: sbom-compiler".to_string()],
                license_list_version: None,
            },
        );
        let mut pkg = SpdxPackage::new("SPDXRef-guava", "com.google.guava:guava:33.0.0");
        pkg.checksums
            .push(Checksum::new(ChecksumAlgorithm::Sha1, "a".repeat(40)));
        pkg.external_refs
            .push(ExternalRef::purl("pkg:maven/com.google.guava/guava@33.0.0"));
        doc.packages.push(pkg);
        doc.relationships
            .push(Relationship::depends_on("SPDXRef-app", "SPDXRef-guava"));
        doc
    }

    #[test]
    fn test_serialized_field_names() {
        let json = sample().to_json().expect("serializes");
        for field in [
            "\"spdxVersion\":\"SPDX-2.3\"",
            "\"SPDXID\":\"SPDXRef-DOCUMENT\"",
            "\"documentNamespace\"",
            "\"relationshipType\":\"DEPENDS_ON\"",
            "\"algorithm\":\"SHA1\"",
            "\"referenceCategory\":\"PACKAGE-MANAGER\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        assert!(!json.contains("hasExtractedLicensingInfos"));
    }

    #[test]
    fn test_json_roundtrip_preserves_document() {
        let doc = sample();
        let parsed = SpdxDocument::from_json(&doc.to_json_pretty().expect("serializes"))
            .expect("parses");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_package_accessors() {
        let doc = sample();
        let pkg = doc.package("SPDXRef-guava").expect("package present");
        assert_eq!(pkg.purl(), Some("pkg:maven/com.google.guava/guava@33.0.0"));
        assert!(pkg.checksum(ChecksumAlgorithm::Sha256).is_none());
        assert_eq!(doc.dependencies_of("SPDXRef-app"), vec!["SPDXRef-guava"]);
    }
}
