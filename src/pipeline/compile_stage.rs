//! Snapshot-to-document compilation stage.

use super::digest::{precompute_digests, DigestStats};
use super::snapshot::BuildSnapshot;
use super::PipelineError;
use crate::compiler::{CompileStats, SbomCompiler};
use crate::config::AppConfig;
use crate::licenses::KnownLicenses;
use crate::model::SpdxDocument;

/// A compiled document with the counters of the run that produced it
#[derive(Debug)]
pub struct CompiledSbom {
    pub document: SpdxDocument,
    pub stats: CompileStats,
    pub digests: DigestStats,
}

/// Compile a snapshot with the given configuration and license table.
///
/// The document name defaults to the snapshot's project path.
pub fn compile_snapshot(
    snapshot: BuildSnapshot,
    config: &AppConfig,
    known: &KnownLicenses,
    quiet: bool,
) -> Result<CompiledSbom, PipelineError> {
    let settings = config.document.to_settings(&snapshot.project_path);
    let scm = config
        .scm
        .to_scm_info()
        .map_err(|e| PipelineError::CompileFailed { source: e.into() })?;

    let (inputs, roots) = snapshot
        .into_inputs()
        .map_err(|e| PipelineError::SnapshotFailed { source: e.into() })?;
    let mut inputs = inputs.with_scm(scm);

    let digests = precompute_digests(&mut inputs.artifacts, quiet)
        .map_err(|source| PipelineError::DigestFailed { source })?;

    let extension = config.extension.to_extension();
    if !extension.is_noop() {
        tracing::debug!(
            mirrors = config.extension.mirrors.len(),
            excluded = config.extension.excluded_projects.len(),
            "Using configured extension"
        );
    }

    let compiler = SbomCompiler::new(settings, known)
        .with_extension(extension)
        .with_options(config.compile_options());
    let (document, stats) = compiler
        .compile_with_stats(&inputs, &roots)
        .map_err(|e| PipelineError::CompileFailed { source: e.into() })?;

    Ok(CompiledSbom {
        document,
        stats,
        digests,
    })
}
