//! Configuration module for sbom-compiler.
//!
//! This module provides:
//! - Type-safe configuration structures that convert into compiler settings
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sbom_compiler::config::{AppConfig, Validatable};
//!
//! let config = AppConfig::builder()
//!     .document_name("my-app")
//!     .namespace("https://example.com/spdx/my-app")
//!     .ignore_non_maven_dependencies(true)
//!     .build();
//! assert!(config.is_valid());
//!
//! // Load from file
//! use sbom_compiler::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-compiler.yaml` file in your project root or `~/.config/sbom-compiler/`:
//!
//! ```yaml
//! document:
//!   namespace: https://example.com/spdx/my-app
//!   uber_package:
//!     name: my-app
//!     version: 1.0.0
//!     supplier: "Organization: Example Inc."
//! behavior:
//!   ignore_non_maven_dependencies: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::DEFAULT_LICENSE_CACHE_TTL_HOURS;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DocumentConfig, ExtensionConfig,
    LicensesConfig, MirrorConfig, OutputConfig, ScmConfig, UberPackageConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.sbom-compiler.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema();
        for section in ["document", "scm", "behavior", "licenses", "extension", "output"] {
            assert!(schema.contains(&format!("\"{section}\"")), "missing {section}");
        }
    }
}
