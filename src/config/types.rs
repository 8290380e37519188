//! Configuration types for sbom-compiler.
//!
//! Every section converts into the value the compiler or pipeline consumes:
//! [`DocumentConfig`] into [`DocumentSettings`], [`ScmConfig`] into an
//! optional [`ScmInfo`], [`ExtensionConfig`] into a [`ConfiguredExtension`].

use crate::compiler::{CompileOptions, ConfiguredExtension, DocumentSettings, UberPackage};
use crate::error::{Result, SbomError};
use crate::model::ScmInfo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// File settings are loaded first and CLI flags are merged over them with
/// [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Document-level settings (name, namespace, creator, uber package)
    pub document: DocumentConfig,
    /// Source control descriptor used for project source info
    pub scm: ScmConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Where the known-license table comes from
    pub licenses: LicensesConfig,
    /// Repository mirrors and excluded projects
    pub extension: ExtensionConfig,
    /// Output configuration
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Compiler switches derived from the behavior section.
    #[must_use]
    pub const fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            ignore_non_maven_dependencies: self.behavior.ignore_non_maven_dependencies,
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the document name.
    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.config.document.name = Some(name.into());
        self
    }

    /// Set the document namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.document.namespace = Some(namespace.into());
        self
    }

    /// Set the extra document creator.
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.config.document.creator = Some(creator.into());
        self
    }

    /// Set the supplier of workspace project packages.
    pub fn package_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.config.document.package_supplier = Some(supplier.into());
        self
    }

    /// Configure the uber package.
    pub fn uber_package(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        supplier: impl Into<String>,
    ) -> Self {
        self.config.document.uber_package = UberPackageConfig {
            name: Some(name.into()),
            version: Some(version.into()),
            supplier: Some(supplier.into()),
        };
        self
    }

    /// Configure the SCM descriptor.
    pub fn scm(
        mut self,
        tool: impl Into<String>,
        uri: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        self.config.scm = ScmConfig {
            tool: Some(tool.into()),
            uri: Some(uri.into()),
            revision: Some(revision.into()),
        };
        self
    }

    /// Skip external components without a manifest.
    pub const fn ignore_non_maven_dependencies(mut self, ignore: bool) -> Self {
        self.config.behavior.ignore_non_maven_dependencies = ignore;
        self
    }

    /// Run the structural verifier after compilation.
    pub const fn verify(mut self, verify: bool) -> Self {
        self.config.behavior.verify = verify;
        self
    }

    /// Exit with a failure code when the verifier reports errors.
    pub const fn fail_on_verification(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_verification = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Load the license list from a local file.
    pub fn license_list(mut self, path: Option<PathBuf>) -> Self {
        self.config.licenses.list_path = path;
        self
    }

    /// Never fetch the license list over the network.
    pub const fn offline(mut self, offline: bool) -> Self {
        self.config.licenses.offline = offline;
        self
    }

    /// Add a repository mirror.
    pub fn mirror(mut self, prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.config.extension.mirrors.push(MirrorConfig {
            prefix: prefix.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Exclude a workspace project from the document.
    pub fn exclude_project(mut self, path: impl Into<String>) -> Self {
        self.config.extension.excluded_projects.push(path.into());
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Write compact instead of pretty-printed JSON.
    pub const fn compact(mut self, compact: bool) -> Self {
        self.config.output.compact = compact;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Document Configuration
// ============================================================================

/// Document-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document name; the snapshot's project path when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Document namespace URI; a random `urn:uuid:` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Extra creator, e.g. "Organization: Example Inc."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Supplier recorded on workspace project packages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_supplier: Option<String>,
    /// Optional root package describing the whole document
    pub uber_package: UberPackageConfig,
}

impl DocumentConfig {
    /// Settings for a compilation. `fallback_name` is used when no name is
    /// configured; the namespace falls back to a fresh `urn:uuid:`.
    #[must_use]
    pub fn to_settings(&self, fallback_name: &str) -> DocumentSettings {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string());
        let namespace = self
            .namespace
            .clone()
            .unwrap_or_else(|| format!("urn:uuid:{}", uuid::Uuid::new_v4()));

        DocumentSettings {
            name,
            namespace,
            creator: self.creator.clone(),
            package_supplier: self.package_supplier.clone(),
            uber_package: self.uber_package.to_uber_package(),
            created: None,
        }
    }
}

/// Uber package fields; all or none must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UberPackageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Supplier, e.g. "Organization: Example Inc."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl UberPackageConfig {
    /// True if no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_none() && self.supplier.is_none()
    }

    /// True if some but not all fields are set
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        let set = self.name.is_some() as u8 + self.version.is_some() as u8 + self.supplier.is_some() as u8;
        set != 0 && set != 3
    }

    #[must_use]
    pub fn to_uber_package(&self) -> UberPackage {
        UberPackage {
            name: self.name.clone(),
            version: self.version.clone(),
            supplier: self.supplier.clone(),
        }
    }
}

// ============================================================================
// SCM Configuration
// ============================================================================

/// Source control descriptor; all or none must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScmConfig {
    /// SCM tool, e.g. "git"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Repository URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Revision the build was made from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ScmConfig {
    /// True if some but not all fields are set
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        let set = self.tool.is_some() as u8 + self.uri.is_some() as u8 + self.revision.is_some() as u8;
        set != 0 && set != 3
    }

    /// The configured descriptor, `None` when unset, an error when partial.
    pub fn to_scm_info(&self) -> Result<Option<ScmInfo>> {
        match (&self.tool, &self.uri, &self.revision) {
            (None, None, None) => Ok(None),
            (Some(tool), Some(uri), Some(revision)) => Ok(Some(ScmInfo::new(tool, uri, revision))),
            _ => Err(SbomError::config(
                "scm requires tool, uri and revision to all be set",
            )),
        }
    }
}

// ============================================================================
// Behavior Configuration
// ============================================================================

/// Behavior flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Skip external components that have no manifest instead of failing
    pub ignore_non_maven_dependencies: bool,
    /// Run the structural verifier on the compiled document
    pub verify: bool,
    /// Exit with code 1 when the verifier reports errors
    pub fail_on_verification: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            ignore_non_maven_dependencies: false,
            verify: true,
            fail_on_verification: false,
            quiet: false,
        }
    }
}

// ============================================================================
// License List Configuration
// ============================================================================

/// Known-license table sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LicensesConfig {
    /// Local SPDX license-list JSON (`licenses.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_path: Option<PathBuf>,
    /// Remote SPDX license-list URL
    pub remote_url: String,
    /// Hours a downloaded license list stays fresh
    #[schemars(range(min = 1))]
    pub cache_ttl_hours: u64,
    /// Never fetch the license list; fall back to the curated table
    pub offline: bool,
}

impl Default for LicensesConfig {
    fn default() -> Self {
        Self {
            list_path: None,
            remote_url: crate::licenses::DEFAULT_LICENSE_LIST_URL.to_string(),
            cache_ttl_hours: super::DEFAULT_LICENSE_CACHE_TTL_HOURS,
            offline: false,
        }
    }
}

// ============================================================================
// Extension Configuration
// ============================================================================

/// Repository mirror rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MirrorConfig {
    /// Repository URL prefix to replace
    pub prefix: String,
    /// Replacement prefix
    pub replacement: String,
}

/// Hooks applied during compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Repository mirrors, first match wins
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<MirrorConfig>,
    /// Project paths that get no package, e.g. ":buildSrc"
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_projects: Vec<String>,
}

impl ExtensionConfig {
    #[must_use]
    pub fn to_extension(&self) -> ConfiguredExtension {
        let with_mirrors = self
            .mirrors
            .iter()
            .fold(ConfiguredExtension::new(), |ext, mirror| {
                ext.with_mirror(&mirror.prefix, &mirror.replacement)
            });
        self.excluded_projects
            .iter()
            .fold(with_mirrors, |ext, path| ext.exclude_project(path))
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (stdout when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Write compact JSON
    pub compact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_sections() {
        let config = AppConfig::builder()
            .document_name("app")
            .namespace("https://example.com/spdx/app")
            .uber_package("all", "1.0", "Organization: Acme")
            .ignore_non_maven_dependencies(true)
            .mirror("https://repo.maven.org/maven2", "https://mirror.example.com/maven2")
            .compact(true)
            .build();

        assert_eq!(config.document.name.as_deref(), Some("app"));
        assert!(!config.document.uber_package.is_partial());
        assert!(config.compile_options().ignore_non_maven_dependencies);
        assert_eq!(config.extension.mirrors.len(), 1);
        assert!(config.output.compact);
        assert!(config.behavior.verify);
    }

    #[test]
    fn test_settings_fall_back_to_generated_namespace() {
        let settings = DocumentConfig::default().to_settings(":app");
        assert_eq!(settings.name, ":app");
        assert!(settings.namespace.starts_with("urn:uuid:"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_scm_is_rejected() {
        assert!(ScmConfig::default().to_scm_info().expect("unset").is_none());

        let partial = ScmConfig {
            tool: Some("git".to_string()),
            ..ScmConfig::default()
        };
        assert!(partial.is_partial());
        assert!(partial.to_scm_info().expect_err("partial").is_config());

        let full = AppConfig::builder()
            .scm("git", "https://github.com/acme/app", "abc123")
            .build();
        let scm = full.scm.to_scm_info().expect("complete").expect("set");
        assert_eq!(scm.tool, "git");
    }

    #[test]
    fn test_extension_config_builds_extension() {
        let config = ExtensionConfig {
            mirrors: vec![MirrorConfig {
                prefix: "https://repo.maven.org/maven2".to_string(),
                replacement: "https://mirror.example.com".to_string(),
            }],
            excluded_projects: vec![":buildSrc".to_string()],
        };
        assert!(!config.to_extension().is_noop());
        assert!(ExtensionConfig::default().to_extension().is_noop());
    }

    #[test]
    fn test_yaml_defaults_fill_missing_sections() {
        let config: AppConfig =
            serde_yaml_ng::from_str("document:\n  name: app\n").expect("valid yaml");
        assert_eq!(config.document.name.as_deref(), Some("app"));
        assert_eq!(config.licenses, LicensesConfig::default());
        assert!(config.behavior.verify);
    }
}
