//! Graph-to-document compiler.
//!
//! [`SbomCompiler::compile`] walks the resolved dependency graph depth-first
//! from the requested roots and produces one [`SpdxDocument`]:
//!
//! - one package per distinct component identity (one per file for external
//!   components with several artifacts)
//! - one `DEPENDS_ON` relationship per recorded parent/child pair, with
//!   skipped components collapsed so their children attach to the nearest
//!   packaged ancestor
//! - licenses resolved against an injected [`KnownLicenses`] table, with
//!   unmatched licenses declared as extracted licenses
//!
//! ```ignore
//! let known = KnownLicenses::curated();
//! let compiler = SbomCompiler::new(settings, &known);
//! let document = compiler.compile(&inputs, &[ComponentId::project(":app")])?;
//! ```
//!
//! Settings are validated before any traversal. Data-quality gaps are logged
//! and replaced by `NOASSERTION`; consistency violations abort compilation.

mod builder;
mod extension;
mod inputs;
mod packages;

pub use extension::{ConfiguredExtension, DefaultExtension, SbomExtension};
pub use inputs::{ArtifactFile, ArtifactIndex, CompileInputs, ProjectIndex, RepositoryIndex};
pub(crate) use inputs::is_readable_file;

use crate::error::{Result, SbomError};
use crate::licenses::KnownLicenses;
use crate::model::{ComponentId, SpdxDocument};
use chrono::{DateTime, Utc};

/// Tool name recorded in the document creators
pub const TOOL_NAME: &str = concat!("sbom-compiler-", env!("CARGO_PKG_VERSION"));

/// Optional root package that describes the whole document.
///
/// Either every field is set or none is; anything in between is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UberPackage {
    pub name: Option<String>,
    pub version: Option<String>,
    pub supplier: Option<String>,
}

impl UberPackage {
    /// Fully specified uber package
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        supplier: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            supplier: Some(supplier.into()),
        }
    }

    /// `(name, version, supplier)` when configured, an error when partial.
    pub fn resolve(&self) -> Result<Option<(&str, &str, &str)>> {
        match (
            self.name.as_deref(),
            self.version.as_deref(),
            self.supplier.as_deref(),
        ) {
            (None, None, None) => Ok(None),
            (Some(name), Some(version), Some(supplier)) => Ok(Some((name, version, supplier))),
            _ => Err(SbomError::config(
                "uber package requires name, version and supplier to all be set",
            )),
        }
    }
}

/// Document-level settings
#[derive(Debug, Clone, Default)]
pub struct DocumentSettings {
    pub name: String,
    pub namespace: String,
    /// Extra creator besides the tool, e.g. `Organization: Example Inc.`
    pub creator: Option<String>,
    /// Supplier for workspace project packages
    pub package_supplier: Option<String>,
    pub uber_package: UberPackage,
    /// Creation timestamp; now when unset
    pub created: Option<DateTime<Utc>>,
}

impl DocumentSettings {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    #[must_use]
    pub fn with_package_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.package_supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn with_uber_package(mut self, uber: UberPackage) -> Self {
        self.uber_package = uber;
        self
    }

    #[must_use]
    pub const fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Reject settings that would produce an invalid document.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SbomError::config("document name must not be empty"));
        }
        if self.namespace.trim().is_empty() {
            return Err(SbomError::config("document namespace must not be empty"));
        }
        self.uber_package.resolve()?;
        Ok(())
    }
}

/// Behavioral switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Skip external components without a manifest instead of failing
    pub ignore_non_maven_dependencies: bool,
}

/// Counters collected during one compilation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub components_visited: usize,
    pub packages: usize,
    pub skipped: usize,
    pub relationships: usize,
    pub extracted_licenses: usize,
}

/// Compiles resolved dependency graphs into SPDX documents.
pub struct SbomCompiler<'a> {
    settings: DocumentSettings,
    known: &'a KnownLicenses,
    extension: Box<dyn SbomExtension + 'a>,
    options: CompileOptions,
}

impl<'a> SbomCompiler<'a> {
    /// Compiler with the default (no-op) extension
    pub fn new(settings: DocumentSettings, known: &'a KnownLicenses) -> Self {
        Self {
            settings,
            known,
            extension: Box::new(DefaultExtension),
            options: CompileOptions::default(),
        }
    }

    /// Use a custom extension
    #[must_use]
    pub fn with_extension(mut self, extension: impl SbomExtension + 'a) -> Self {
        self.extension = Box::new(extension);
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Document settings in use
    #[must_use]
    pub const fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Compile the graph reachable from `roots` into a document.
    pub fn compile(&self, inputs: &CompileInputs, roots: &[ComponentId]) -> Result<SpdxDocument> {
        self.compile_with_stats(inputs, roots).map(|(doc, _)| doc)
    }

    /// Like [`compile`](Self::compile), also returning traversal counters.
    pub fn compile_with_stats(
        &self,
        inputs: &CompileInputs,
        roots: &[ComponentId],
    ) -> Result<(SpdxDocument, CompileStats)> {
        self.settings.validate()?;

        let builder = builder::DocumentBuilder::new(
            &self.settings,
            self.known,
            self.extension.as_ref(),
            self.options,
            inputs,
        )?;
        let (document, stats) = builder.build(roots)?;

        tracing::info!(
            packages = stats.packages,
            relationships = stats.relationships,
            skipped = stats.skipped,
            extracted_licenses = stats.extracted_licenses,
            "Compiled SPDX document '{}'",
            document.name
        );
        Ok((document, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uber_package_all_or_nothing() {
        assert_eq!(UberPackage::default().resolve().expect("empty is fine"), None);
        assert!(UberPackage::new("all", "1.0", "Organization: Acme")
            .resolve()
            .expect("complete")
            .is_some());

        let partial = UberPackage {
            name: Some("all".to_string()),
            ..UberPackage::default()
        };
        let err = partial.resolve().expect_err("partial is rejected");
        assert!(err.is_config());
    }

    #[test]
    fn test_settings_validation() {
        assert!(DocumentSettings::new("doc", "https://example.com/ns")
            .validate()
            .is_ok());
        assert!(DocumentSettings::new(" ", "https://example.com/ns")
            .validate()
            .expect_err("blank name")
            .is_config());
        assert!(DocumentSettings::new("doc", "")
            .validate()
            .expect_err("blank namespace")
            .is_config());
    }
}
