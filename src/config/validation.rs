//! Configuration validation for sbom-compiler.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::*;
use url::Url;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.document.validate());
        errors.extend(self.scm.validate());
        errors.extend(self.licenses.validate());
        errors.extend(self.extension.validate());
        errors
    }
}

const SUPPLIER_PREFIXES: &[&str] = &["Person:", "Organization:", "NOASSERTION"];
const CREATOR_PREFIXES: &[&str] = &["Person:", "Organization:", "Tool:"];

fn has_prefix(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| value.starts_with(p))
}

impl Validatable for DocumentConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                errors.push(ConfigError::new("document.name", "Document name must not be empty"));
            }
        }

        if let Some(ref namespace) = self.namespace {
            if let Err(e) = Url::parse(namespace) {
                errors.push(ConfigError::new(
                    "document.namespace",
                    format!("Namespace '{namespace}' is not an absolute URI: {e}"),
                ));
            }
        }

        if let Some(ref creator) = self.creator {
            if !has_prefix(creator, CREATOR_PREFIXES) {
                errors.push(ConfigError::new(
                    "document.creator",
                    format!(
                        "Creator '{creator}' must start with one of: {}",
                        CREATOR_PREFIXES.join(", ")
                    ),
                ));
            }
        }

        if let Some(ref supplier) = self.package_supplier {
            if !has_prefix(supplier, SUPPLIER_PREFIXES) {
                errors.push(ConfigError::new(
                    "document.package_supplier",
                    format!(
                        "Supplier '{supplier}' must start with one of: {}",
                        SUPPLIER_PREFIXES.join(", ")
                    ),
                ));
            }
        }

        errors.extend(self.uber_package.validate());
        errors
    }
}

impl Validatable for UberPackageConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.is_partial() {
            errors.push(ConfigError::new(
                "document.uber_package",
                "name, version and supplier must either all be set or all be unset",
            ));
        }
        if let Some(ref supplier) = self.supplier {
            if !has_prefix(supplier, SUPPLIER_PREFIXES) {
                errors.push(ConfigError::new(
                    "document.uber_package.supplier",
                    format!(
                        "Supplier '{supplier}' must start with one of: {}",
                        SUPPLIER_PREFIXES.join(", ")
                    ),
                ));
            }
        }
        errors
    }
}

impl Validatable for ScmConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.is_partial() {
            vec![ConfigError::new(
                "scm",
                "tool, uri and revision must either all be set or all be unset",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Validatable for LicensesConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.cache_ttl_hours == 0 {
            errors.push(ConfigError::new(
                "licenses.cache_ttl_hours",
                "Cache TTL must be at least one hour",
            ));
        }
        if let Err(e) = Url::parse(&self.remote_url) {
            errors.push(ConfigError::new(
                "licenses.remote_url",
                format!("Invalid URL '{}': {e}", self.remote_url),
            ));
        }
        errors
    }
}

impl Validatable for ExtensionConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (i, mirror) in self.mirrors.iter().enumerate() {
            if mirror.prefix.is_empty() {
                errors.push(ConfigError::new(
                    &format!("extension.mirrors[{i}].prefix"),
                    "Mirror prefix must not be empty",
                ));
            }
            if let Err(e) = Url::parse(&mirror.replacement) {
                errors.push(ConfigError::new(
                    &format!("extension.mirrors[{i}].replacement"),
                    format!("Invalid URL '{}': {e}", mirror.replacement),
                ));
            }
        }
        for path in &self.excluded_projects {
            if !path.starts_with(':') {
                errors.push(ConfigError::new(
                    "extension.excluded_projects",
                    format!("Project path '{path}' must start with ':'"),
                ));
            }
        }
        errors
    }
}
