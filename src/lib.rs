//! **Compile SPDX 2.3 bills of materials from resolved build dependency graphs.**
//!
//! `sbom-compiler` takes the dependency graph a build tool has already
//! resolved, together with the artifact files, upstream Maven manifests and
//! repository declarations it collected, and turns it into a single
//! deduplicated SPDX document: one package per component, `DEPENDS_ON`
//! relationships, inferred licenses and suppliers, checksums, download
//! locations and package URLs.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: component identities, the resolved graph, manifests and
//!   the SPDX document model with its JSON serialization.
//! - **[`compiler`]**: the [`SbomCompiler`], which walks the graph
//!   depth-first, deduplicates shared sub-trees and collapses components that
//!   produce no package. Customization goes through the [`SbomExtension`] trait.
//! - **[`licenses`]**: the injected [`KnownLicenses`] table (URL to SPDX id)
//!   and the per-run [`LicenseResolver`] that mints `LicenseRef-` entries.
//! - **[`supplier`]** and **[`locator`]**: supplier inference and
//!   download-location / package-URL synthesis.
//! - **[`quality`]**: the [`DocumentVerifier`] structural checks.
//! - **[`pipeline`]**: load → digest → compile → verify → write stages used by
//!   the CLI.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_compiler::compiler::{ArtifactFile, CompileInputs, DocumentSettings, SbomCompiler};
//! use sbom_compiler::licenses::KnownLicenses;
//! use sbom_compiler::model::{ComponentId, DependencyGraph, ManifestInfo, ProjectInfo, ResolvedComponent};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = ComponentId::project(":app");
//!     let guava = ComponentId::module("com.google.guava", "guava", "33.0.0-jre");
//!
//!     let graph: DependencyGraph = [
//!         ResolvedComponent::new(app.clone()).depends_on(guava.clone()),
//!         ResolvedComponent::new(guava.clone()).with_repository("MavenRepo"),
//!     ]
//!     .into_iter()
//!     .collect();
//!
//!     let mut inputs = CompileInputs::new(graph);
//!     inputs.projects.insert(ProjectInfo::new("app", ":app").with_version("1.0.0"));
//!     inputs.repositories.insert_url("MavenRepo", "https://repo.maven.org/maven2")?;
//!     inputs.artifacts.insert(&guava, ArtifactFile::new("libs/guava-33.0.0-jre.jar"));
//!     inputs.manifests.insert(
//!         &guava,
//!         ManifestInfo::new()
//!             .with_license("Apache License, Version 2.0", Some("http://www.apache.org/licenses/LICENSE-2.0.txt")),
//!     );
//!
//!     let known = KnownLicenses::curated();
//!     let settings = DocumentSettings::new("app", "https://example.com/spdx/app");
//!     let document = SbomCompiler::new(settings, &known).compile(&inputs, &[app])?;
//!
//!     println!("{}", document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote-licenses` (default): fetch the SPDX license list over HTTPS with
//!   `reqwest` and cache it. Without it only local license lists and the
//!   curated table are available.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod licenses;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod supplier;
pub mod utils;

// Re-export main types for convenience
pub use compiler::{
    CompileInputs, CompileOptions, CompileStats, ConfiguredExtension, DefaultExtension,
    DocumentSettings, SbomCompiler, SbomExtension, UberPackage,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, Result, SbomError};
pub use licenses::{KnownLicenses, LicenseResolver};
pub use locator::{download_location, package_url, RepositoryUri};
pub use model::{ComponentId, DependencyGraph, ModuleCoordinates, SpdxDocument};
pub use quality::{DocumentVerifier, VerificationResult};
pub use supplier::infer_supplier;
