//! Compile command handler.
//!
//! Implements the `compile` subcommand: build snapshot in, SPDX JSON out.

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{
    compile_snapshot, exit_codes, load_known_licenses, load_snapshot, render_document,
    verify_document, write_output, OutputTarget, PipelineError,
};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Compile command configuration
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Build snapshot exported by the build
    pub snapshot_path: PathBuf,
    /// Effective configuration (file merged with CLI flags)
    pub config: AppConfig,
}

/// Run the compile command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_compile(config: CompileConfig) -> Result<i32> {
    let CompileConfig {
        snapshot_path,
        config,
    } = config;
    let quiet = config.behavior.quiet;

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{error}");
        }
        bail!("Invalid configuration ({} errors)", errors.len());
    }

    let (known, source) = load_known_licenses(&config.licenses, quiet)?;
    tracing::debug!(?source, "Known-license table ready");

    let snapshot = load_snapshot(&snapshot_path, quiet)?;
    let compiled = compile_snapshot(snapshot, &config, &known, quiet)?;

    if !quiet {
        tracing::info!(
            packages = compiled.stats.packages,
            relationships = compiled.stats.relationships,
            skipped = compiled.stats.skipped,
            digests_computed = compiled.digests.computed,
            digests_skipped = compiled.digests.skipped,
            "Compiled {}",
            compiled.document.name
        );
    }

    let mut exit_code = exit_codes::SUCCESS;
    if config.behavior.verify {
        let result = verify_document(&compiled.document, quiet);
        if result.error_count > 0 && config.behavior.fail_on_verification {
            exit_code = exit_codes::VERIFICATION_FAILED;
        }
    }

    let rendered = render_document(&compiled.document, config.output.compact)
        .map_err(|source| PipelineError::OutputFailed { source })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&rendered, &target, quiet)
        .map_err(|source| PipelineError::OutputFailed { source })?;

    Ok(exit_code)
}
